pub mod density;
pub mod length;
pub mod mass;
pub mod time;
pub mod velocity;


pub use density::{BASALT_DENSITY, Density, ICE_DENSITY, IRON_DENSITY};
pub use length::{AU_TO_M, Length, SOLAR_RADIUS_M};
pub use mass::{CERES_MASS_KG, EARTH_MASS_KG, EARTH_WATER_MASS_KG, Mass, SOLAR_MASS_KG};
pub use time::{SECONDS_PER_YEAR, Time};
pub use velocity::{G_SI, Velocity, mutual_escape_velocity};
