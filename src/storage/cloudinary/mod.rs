pub mod assets;
pub mod client;
pub mod request;
pub mod signer;
pub mod url;

pub use assets::*;
pub use client::*;
pub use request::*;
pub use url::*;
