use crystal_sim_core::{
    BoundaryPolicy, CrystalSimulation, GridConfig, ModelParams, NucleusShape, SolverConfig,
};
use std::ptr;
use std::sync::RwLock;

use crate::error::{CrystalSimErrorCode, DefaultCrystalSimError};
use crate::helpers::{track_error, track_result};

/// Grid edge handling, mirrors `BoundaryPolicy`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalSimBoundary {
    /// Wrap around (torus)
    Periodic = 0,
    /// Clamp to the nearest edge cell (zero flux)
    Neumann = 1,
}

impl From<CrystalSimBoundary> for BoundaryPolicy {
    fn from(boundary: CrystalSimBoundary) -> Self {
        match boundary {
            CrystalSimBoundary::Periodic => BoundaryPolicy::Periodic,
            CrystalSimBoundary::Neumann => BoundaryPolicy::Neumann,
        }
    }
}

/// Initial seed shape.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalSimNucleus {
    /// Cross for planar grids, sphere of radius 3 for volumetric grids
    Default = 0,
    /// Five-cell cross on the active slice
    Cross = 1,
    /// Filled sphere of `sphere_radius` cells
    Sphere = 2,
}

/// Flat, C-compatible simulation configuration.
///
/// Obtain defaults with `crystal_sim_default_config` and override fields as needed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrystalSimConfig {
    /// Cells along x
    pub width: usize,
    /// Cells along y
    pub height: usize,
    /// Cells along z, 0 for a planar grid
    pub depth: usize,
    /// Cell spacing (x and y)
    pub spacing: f32,
    /// Cell spacing along z (volumetric grids only)
    pub spacing_z: f32,
    /// Explicit time step
    pub dt: f32,
    pub boundary: CrystalSimBoundary,
    pub nucleus: CrystalSimNucleus,
    /// Radius used by `CrystalSimNucleus::Sphere`
    pub sphere_radius: f32,
    /// Coupled sub-steps per `crystal_sim_step`
    pub substeps_per_frame: u32,
    /// Relaxation time `tau`
    pub tau: f32,
    pub epsilon_bar: f32,
    pub latent_heat: f32,
    pub anisotropy_strength: f32,
    pub anisotropy_mode: f32,
    pub alpha: f32,
    pub gamma: f32,
    pub equilibrium_temperature: f32,
    /// Interface noise amplitude, 0 disables noise
    pub noise_amplitude: f32,
    pub noise_seed: u64,
}

impl From<&SolverConfig> for CrystalSimConfig {
    fn from(config: &SolverConfig) -> Self {
        let (nucleus, sphere_radius) = match config.nucleus {
            None => (CrystalSimNucleus::Default, 3.0),
            Some(NucleusShape::Cross) => (CrystalSimNucleus::Cross, 3.0),
            Some(NucleusShape::Sphere { radius }) => (CrystalSimNucleus::Sphere, radius),
        };
        Self {
            width: config.grid.width,
            height: config.grid.height,
            depth: config.grid.depth.unwrap_or(0),
            spacing: config.grid.dx,
            spacing_z: config.grid.dz,
            dt: config.grid.dt,
            boundary: match config.grid.boundary {
                BoundaryPolicy::Periodic => CrystalSimBoundary::Periodic,
                BoundaryPolicy::Neumann => CrystalSimBoundary::Neumann,
            },
            nucleus,
            sphere_radius,
            substeps_per_frame: config.substeps_per_frame,
            tau: config.model.tau,
            epsilon_bar: config.model.epsilon_bar,
            latent_heat: config.model.latent_heat,
            anisotropy_strength: config.model.anisotropy_strength,
            anisotropy_mode: config.model.anisotropy_mode,
            alpha: config.model.alpha,
            gamma: config.model.gamma,
            equilibrium_temperature: config.model.equilibrium_temperature,
            noise_amplitude: config.model.noise_amplitude,
            noise_seed: config.noise_seed,
        }
    }
}

impl From<&CrystalSimConfig> for SolverConfig {
    fn from(config: &CrystalSimConfig) -> Self {
        let depth = (config.depth > 0).then_some(config.depth);
        let base = match depth {
            Some(depth) => SolverConfig::volumetric(config.width, config.height, depth),
            None => SolverConfig::planar(config.width, config.height),
        };
        let nucleus = match config.nucleus {
            CrystalSimNucleus::Default => None,
            CrystalSimNucleus::Cross => Some(NucleusShape::Cross),
            CrystalSimNucleus::Sphere => Some(NucleusShape::Sphere {
                radius: config.sphere_radius,
            }),
        };

        SolverConfig {
            grid: GridConfig {
                dx: config.spacing,
                dy: config.spacing,
                dz: config.spacing_z,
                dt: config.dt,
                boundary: config.boundary.into(),
                ..base.grid
            },
            model: ModelParams {
                tau: config.tau,
                epsilon_bar: config.epsilon_bar,
                latent_heat: config.latent_heat,
                anisotropy_strength: config.anisotropy_strength,
                anisotropy_mode: config.anisotropy_mode,
                alpha: config.alpha,
                gamma: config.gamma,
                equilibrium_temperature: config.equilibrium_temperature,
                noise_amplitude: config.noise_amplitude,
            },
            nucleus,
            substeps_per_frame: config.substeps_per_frame,
            noise_seed: config.noise_seed,
            ..base
        }
    }
}

/// Default configuration for a grid of the given size.
///
/// `depth = 0` produces a planar grid with periodic boundaries, any other
/// depth a volumetric grid with Neumann boundaries.
#[no_mangle]
pub extern "C" fn crystal_sim_default_config(
    width: usize,
    height: usize,
    depth: usize,
) -> CrystalSimConfig {
    let config = if depth == 0 {
        SolverConfig::planar(width, height)
    } else {
        SolverConfig::volumetric(width, height, depth)
    };
    CrystalSimConfig::from(&config)
}

/// The crystal growth simulation context.
///
/// # Thread Safety
/// The simulation sits behind an `RwLock`: queries take the read lock,
/// commands take the write lock. The instance may be shared across threads.
pub struct CrystalSimInstance {
    pub(crate) sim: RwLock<CrystalSimulation>,
}

impl CrystalSimInstance {
    /// Validates `config` and builds the simulation.
    ///
    /// # Errors
    ///
    /// Returns `CrystalSimErrorCode::InvalidConfig` when validation fails.
    pub(crate) fn new(config: &CrystalSimConfig) -> Result<Box<Self>, DefaultCrystalSimError> {
        let sim = CrystalSimulation::init(SolverConfig::from(config))
            .map_err(|e| DefaultCrystalSimError::invalid_config(&e))?;
        Ok(Box::new(Self {
            sim: RwLock::new(sim),
        }))
    }
}

/// Create a new simulation instance and return it via out-parameter.
///
/// Returns
/// - `CrystalSimErrorCode::Ok` (0) with a valid instance in `out_instance`
/// - `CrystalSimErrorCode::NullPointer` if `config` or `out_instance` is null
/// - `CrystalSimErrorCode::InvalidConfig` if the configuration fails validation
///
/// On failure `out_instance` is set to null (when writable) and
/// `crystal_sim_get_last_error()` describes the problem.
///
/// # Safety
///
/// - `config` must be null or point to a valid `CrystalSimConfig`.
/// - `out_instance` must be null or point to writable memory.
/// - The caller owns the returned instance and MUST call `crystal_sim_destroy`
///   exactly once.
///
/// Example (C++)
/// ```cpp
/// CrystalSimConfig config = crystal_sim_default_config(250, 250, 0);
/// CrystalSimInstance* sim = nullptr;
/// if (crystal_sim_new(&config, &sim) != CrystalSimErrorCode::Ok) {
///     fprintf(stderr, "Failed to create simulation: %s\n", crystal_sim_get_last_error());
///     return;
/// }
/// // ... use sim ...
/// crystal_sim_destroy(sim);
/// ```
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_new(
    config: *const CrystalSimConfig,
    out_instance: *mut *mut CrystalSimInstance,
) -> CrystalSimErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultCrystalSimError::null_pointer("out_instance"));
    }
    // SAFETY: caller guarantees `config` is null or valid.
    let Some(config) = (unsafe { config.as_ref() }) else {
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultCrystalSimError::null_pointer("config"));
    };

    match track_result(CrystalSimInstance::new(config)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            CrystalSimErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `crystal_sim_new`.
///
/// Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `crystal_sim_new` and not freed already.
/// - The caller must not use the pointer afterwards.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_destroy(ptr: *mut CrystalSimInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: `ptr` came from `Box::into_raw` in `crystal_sim_new`.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{crystal_sim_get_last_error, crystal_sim_get_last_error_code};
    use std::ffi::CStr;

    #[test]
    fn test_default_config_round_trips() {
        let config = crystal_sim_default_config(64, 48, 0);
        let solver = SolverConfig::from(&config);
        assert_eq!(solver, SolverConfig::planar(64, 48));

        let config = crystal_sim_default_config(32, 32, 8);
        assert_eq!(config.boundary, CrystalSimBoundary::Neumann);
        assert_eq!(SolverConfig::from(&config).grid.depth, Some(8));
    }

    #[test]
    fn test_new_and_destroy() {
        let config = crystal_sim_default_config(16, 16, 0);
        let mut instance: *mut CrystalSimInstance = ptr::null_mut();
        let code = unsafe { crystal_sim_new(&config, &mut instance) };
        assert_eq!(code, CrystalSimErrorCode::Ok);
        assert!(!instance.is_null());
        assert!(crystal_sim_get_last_error().is_null());
        unsafe { crystal_sim_destroy(instance) };
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = crystal_sim_default_config(16, 16, 0);
        config.spacing = 0.0;
        let mut instance: *mut CrystalSimInstance = ptr::null_mut();
        let code = unsafe { crystal_sim_new(&config, &mut instance) };
        assert_eq!(code, CrystalSimErrorCode::InvalidConfig);
        assert!(instance.is_null());
        assert_eq!(
            crystal_sim_get_last_error_code(),
            CrystalSimErrorCode::InvalidConfig
        );
    }

    #[test]
    fn test_new_rejects_bad_sphere_radius() {
        let mut config = crystal_sim_default_config(16, 16, 8);
        config.nucleus = CrystalSimNucleus::Sphere;
        config.sphere_radius = f32::NAN;
        let mut instance: *mut CrystalSimInstance = ptr::null_mut();
        let code = unsafe { crystal_sim_new(&config, &mut instance) };
        assert_eq!(code, CrystalSimErrorCode::InvalidConfig);
        assert!(instance.is_null());
    }

    #[test]
    fn test_new_null_pointers() {
        let config = crystal_sim_default_config(16, 16, 0);
        let code = unsafe { crystal_sim_new(&config, ptr::null_mut()) };
        assert_eq!(code, CrystalSimErrorCode::NullPointer);
        let message = unsafe { CStr::from_ptr(crystal_sim_get_last_error()) };
        assert!(message.to_string_lossy().contains("out_instance"));

        let mut instance: *mut CrystalSimInstance = ptr::null_mut();
        let code = unsafe { crystal_sim_new(ptr::null(), &mut instance) };
        assert_eq!(code, CrystalSimErrorCode::NullPointer);
        assert!(instance.is_null());

        unsafe { crystal_sim_destroy(ptr::null_mut()) };
    }
}
