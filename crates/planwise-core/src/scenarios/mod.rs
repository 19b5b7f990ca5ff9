pub mod bands;

pub use bands::{project_bands, BandRow, BandsInput};
