mod minor_units;
mod secret;

pub mod helpers;

pub use minor_units::MinorUnits;
pub use secret::Secret;
