//! Initial conditions from the disk generator's text output
//!
//! The file starts with comment lines, two of which announce the number of
//! embryos (`Generated N minor bodies`) and planetesimals
//! (`Generated N small bodies`). Each data line is
//!
//! ```text
//! m a e inc omega Omega M [cmf mmf wmf]
//! ```
//!
//! with the mass in kg, the semi-major axis in AU and angles in radians. Lines
//! without composition columns are the Sun (`a == 0`) and the two gas giants.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use units::{Length, Mass};

use crate::error::{AccretionError, Result};
use crate::radius::LayeredRadius;
use crate::registry::{BodyRecord, BodyType};

/// Sun plus two gas giants precede the embryos in every file
pub const MASSIVE_BODIES: u32 = 3;

const FRACTION_TOLERANCE: f64 = 1e-10;

/// Keplerian elements of a seed orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis in AU
    pub a: f64,
    pub e: f64,
    pub inc: f64,
    /// Argument of periapsis
    pub omega: f64,
    /// Longitude of the ascending node
    pub big_omega: f64,
    /// Mean anomaly
    pub mean_anomaly: f64,
}

/// One body of the initial conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedBody {
    pub mass: Mass,
    /// `None` for the central body, which sits at the origin
    pub orbit: Option<OrbitalElements>,
    pub body_type: BodyType,
    pub water_mass_fraction: f64,
    pub core_mass_fraction: f64,
}

impl SeedBody {
    pub fn record(&self) -> Result<BodyRecord> {
        BodyRecord::new(
            self.water_mass_fraction,
            self.core_mass_fraction,
            self.body_type,
            self.mass,
        )
    }

    /// Physical radius the body starts with
    pub fn radius(&self) -> Length {
        match self.body_type {
            BodyType::Sun => Length::from_solar_radii(1.0),
            _ => LayeredRadius::new(self.mass, self.water_mass_fraction, self.core_mass_fraction)
                .total_radius(),
        }
    }
}

/// Parsed initial conditions
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    pub num_embryos: u32,
    pub num_planetesimals: u32,
    pub bodies: Vec<SeedBody>,
}

impl InitialConditions {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AccretionError::io(path, e))?;
        Self::parse(&text)
    }

    /// Parses the generator output
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::initcon::InitialConditions;
    /// use accretion::registry::BodyType;
    ///
    /// let text = "\
    /// ## Generated 1 minor bodies
    /// ## Generated 1 small bodies
    /// 1.989e30 0 0 0 0 0 0
    /// 1.898e27 5.2 0.048 0.02 0.1 0.2 0.3
    /// 5.683e26 9.5 0.056 0.04 0.1 0.2 0.3
    /// 6e23 1.0 0.01 0.01 0.5 0.6 0.7 0.3 0.69 0.01
    /// 6e21 2.5 0.02 0.01 0.5 0.6 0.7 0.3 0.6 0.1
    /// ";
    /// let ic = InitialConditions::parse(text).unwrap();
    /// let types: Vec<BodyType> = ic.bodies.iter().map(|b| b.body_type).collect();
    /// assert_eq!(
    ///     types,
    ///     [BodyType::Sun, BodyType::GasGiant, BodyType::GasGiant, BodyType::Embryo, BodyType::Planetesimal]
    /// );
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let num_embryos = header_count(text, "minor")?;
        let num_planetesimals = header_count(text, "small")?;

        let mut bodies = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("ERROR") {
                continue;
            }
            let columns = trimmed
                .split_whitespace()
                .map(|c| c.parse::<f64>())
                .collect::<std::result::Result<Vec<f64>, _>>()
                .map_err(|e| AccretionError::InitialConditions {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            let position = bodies.len() as u32 + 1;
            bodies.push(parse_body(&columns, position, num_embryos, line_no)?);
        }

        let expected = num_embryos + num_planetesimals + MASSIVE_BODIES;
        if bodies.len() != expected as usize {
            return Err(AccretionError::InitialConditions {
                line: text.lines().count(),
                reason: format!(
                    "expected {} bodies ({} embryos, {} planetesimals, sun and giants), found {}",
                    expected,
                    num_embryos,
                    num_planetesimals,
                    bodies.len()
                ),
            });
        }
        Ok(Self {
            num_embryos,
            num_planetesimals,
            bodies,
        })
    }

    /// Bodies that gravitationally interact with everything
    pub fn n_active(&self) -> u32 {
        self.num_embryos + MASSIVE_BODIES
    }
}

/// Finds `Generated <N> <kind> bodies` anywhere in the text
fn header_count(text: &str, kind: &str) -> Result<u32> {
    for (index, line) in text.lines().enumerate() {
        let words: Vec<&str> = line.split_whitespace().collect();
        for window in words.windows(4) {
            if window[0] == "Generated" && window[2] == kind && window[3] == "bodies" {
                return window[1]
                    .parse()
                    .map_err(|_| AccretionError::InitialConditions {
                        line: index + 1,
                        reason: format!("invalid body count {:?}", window[1]),
                    });
            }
        }
    }
    Err(AccretionError::InitialConditions {
        line: 0,
        reason: format!("missing \"Generated N {} bodies\" header", kind),
    })
}

fn parse_body(columns: &[f64], position: u32, num_embryos: u32, line: usize) -> Result<SeedBody> {
    let (water, core, body_type) = match columns.len() {
        7 => {
            let body_type = if columns[1] == 0.0 {
                BodyType::Sun
            } else {
                BodyType::GasGiant
            };
            (0.0, 1.0, body_type)
        }
        10 => {
            let (cmf, mut mmf, wmf) = (columns[7], columns[8], columns[9]);
            let total = cmf + mmf + wmf;
            if total != 1.0 {
                let diff = 1.0 - total;
                log::warn!(
                    "line {}: fractions don't add up by {:e}, adding rest to mantle",
                    line,
                    diff
                );
                mmf += diff;
            }
            if (cmf + mmf + wmf - 1.0).abs() > FRACTION_TOLERANCE || mmf < -FRACTION_TOLERANCE {
                return Err(AccretionError::InitialConditions {
                    line,
                    reason: format!("invalid composition cmf={} wmf={}", cmf, wmf),
                });
            }
            let body_type = if position > num_embryos + MASSIVE_BODIES {
                BodyType::Planetesimal
            } else {
                BodyType::Embryo
            };
            (wmf, cmf, body_type)
        }
        n => {
            return Err(AccretionError::InitialConditions {
                line,
                reason: format!("expected 7 or 10 columns, found {}", n),
            });
        }
    };

    let orbit = (body_type != BodyType::Sun).then(|| OrbitalElements {
        a: columns[1],
        e: columns[2],
        inc: columns[3],
        omega: columns[4],
        big_omega: columns[5],
        mean_anomaly: columns[6],
    });

    Ok(SeedBody {
        mass: Mass::from_kg(columns[0]),
        orbit,
        body_type,
        water_mass_fraction: water,
        core_mass_fraction: core,
    })
}
