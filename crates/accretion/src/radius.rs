use units::{BASALT_DENSITY, Density, ICE_DENSITY, IRON_DENSITY, Length, Mass};

/// Radius of a differentiated body with an iron core, a basalt mantle and an
/// ice shell
///
/// Each layer's outer radius comes from the volume of everything inside it:
/// the core is a sphere of iron, the mantle adds its basalt volume on top and
/// the water adds its ice volume on top of that.
///
/// # Examples
///
/// ```
/// use accretion::radius::LayeredRadius;
/// use units::Mass;
///
/// let body = LayeredRadius::new(Mass::from_earth_masses(1.0), 0.0, 0.3);
/// let r = body.total_radius().to_km();
/// // Denser than a pure basalt sphere, smaller than a pure ice one
/// assert!(r > 6_000.0 && r < 7_500.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayeredRadius {
    pub total_mass: Mass,
    pub water_mass_fraction: f64,
    pub core_mass_fraction: f64,
}

impl LayeredRadius {
    pub fn new(total_mass: Mass, water_mass_fraction: f64, core_mass_fraction: f64) -> Self {
        Self {
            total_mass,
            water_mass_fraction,
            core_mass_fraction,
        }
    }

    fn mantle_mass_fraction(&self) -> f64 {
        (1.0 - self.water_mass_fraction - self.core_mass_fraction).max(0.0)
    }

    pub fn core_radius(&self) -> Length {
        let core = self.total_mass * self.core_mass_fraction;
        Length::from_meters(IRON_DENSITY.sphere_radius(core))
    }

    pub fn mantle_radius(&self) -> Length {
        let mantle = self.total_mass * self.mantle_mass_fraction();
        shell(self.core_radius(), mantle, BASALT_DENSITY)
    }

    pub fn total_radius(&self) -> Length {
        let water = self.total_mass * self.water_mass_fraction;
        shell(self.mantle_radius(), water, ICE_DENSITY)
    }
}

/// Outer radius of a shell of `mass` at `density` laid over a sphere of radius `inner`
fn shell(inner: Length, mass: Mass, density: Density) -> Length {
    let inner_volume = 4.0 / 3.0 * std::f64::consts::PI * inner.to_meters().powi(3);
    let volume = inner_volume + density.volume_of(mass);
    Length::from_meters((volume * 3.0 / (4.0 * std::f64::consts::PI)).cbrt())
}
