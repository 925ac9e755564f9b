pub mod asset;
pub mod delivery;

pub use asset::AssetService;
pub use delivery::DeliveryService;
