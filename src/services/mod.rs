//! Service Layer
//!
//! External collaborators of the grid core: the remote transport and the
//! tokio bridge it runs on.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               GridController                  │
//! │  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │   DataProvider   │  │    Paginator     │  │
//! │  └──────────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────────┘
//!            │ RemoteQuery        ▲ RemotePage
//!            ▼                    │
//! ┌──────────────────────────────────────────────┐
//! │   Transport (HttpTransport on tokio bridge)   │
//! └──────────────────────────────────────────────┘
//! ```

pub mod runtime;
pub mod transport;

pub use runtime::{block_on, run_in_tokio};
pub use transport::{HttpTransport, RemotePage, RemoteQuery, ResponseShape, Transport};
