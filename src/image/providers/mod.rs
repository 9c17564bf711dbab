//! Image generation providers.

mod relay;
mod vyro;

pub use relay::{RelayProvider, RelayProviderBuilder};
pub use vyro::{VyroProvider, VyroProviderBuilder};
