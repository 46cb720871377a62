//! Read-only queries (read lock)
//!
//! Array queries copy into caller-owned buffers. Passing a buffer shorter
//! than the data returns `InvalidParameter` and leaves the buffer untouched.

use crystal_sim_core::{CameraState, CrystalSimulation, SimulationStats};

use crate::error::{CrystalSimErrorCode, DefaultCrystalSimError};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_crystal_sim};
use crate::instance::CrystalSimInstance;

/// Run statistics over the active slice.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CrystalSimStats {
    /// Advancing steps since init or reset
    pub frame: u64,
    /// Sub-steps since init or reset
    pub substeps: u64,
    /// `substeps * dt`
    pub simulation_time: f32,
    /// Fraction of cells with `phi >= 0.5`
    pub solid_fraction: f32,
    pub phi_min: f32,
    pub phi_max: f32,
    pub temperature_min: f32,
    pub temperature_max: f32,
    /// NaN or infinite `phi`/`T` values
    pub non_finite_cells: usize,
}

impl From<&SimulationStats> for CrystalSimStats {
    fn from(stats: &SimulationStats) -> Self {
        Self {
            frame: stats.frame,
            substeps: stats.substeps,
            simulation_time: stats.simulation_time,
            solid_fraction: stats.solid_fraction,
            phi_min: stats.phi_min,
            phi_max: stats.phi_max,
            temperature_min: stats.temperature_min,
            temperature_max: stats.temperature_max,
            non_finite_cells: stats.non_finite_cells,
        }
    }
}

/// Orbit camera angles (degrees) and distance.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrystalSimCamera {
    pub rot_x_deg: f32,
    pub rot_y_deg: f32,
    pub distance: f32,
}

impl From<&CameraState> for CrystalSimCamera {
    fn from(camera: &CameraState) -> Self {
        Self {
            rot_x_deg: camera.rot_x_deg,
            rot_y_deg: camera.rot_y_deg,
            distance: camera.distance,
        }
    }
}

/// Full-grid scalar field selector for `crystal_sim_copy_field`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalSimField {
    /// Order parameter `phi`
    Phi = 0,
    /// Temperature `T`
    Temperature = 1,
    /// Orientation `Omega` in `[0, 2π)`
    Orientation = 2,
}

/// Write `value` through `out` or fail with `NullPointer`.
fn write_out<T>(out: *mut T, name: &str, value: T) -> Result<(), DefaultCrystalSimError> {
    if out.is_null() {
        return Err(DefaultCrystalSimError::null_pointer(name));
    }
    // SAFETY: non-null; callers guarantee writability.
    unsafe {
        *out = value;
    }
    Ok(())
}

/// Copy `src` into the caller buffer `out[..len]`.
fn copy_into<T: Copy>(
    src: &[T],
    out: *mut T,
    len: usize,
    name: &str,
) -> Result<(), DefaultCrystalSimError> {
    if out.is_null() {
        return Err(DefaultCrystalSimError::null_pointer(name));
    }
    if len < src.len() {
        return Err(DefaultCrystalSimError::buffer_too_small(name, src.len(), len));
    }
    // SAFETY: non-null, caller guarantees `len` writable elements, len >= src.len().
    let dst = unsafe { std::slice::from_raw_parts_mut(out, src.len()) };
    dst.copy_from_slice(src);
    Ok(())
}

/// Whether `crystal_sim_step` is currently a no-op.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_paused` must be null or point to writable memory.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_is_paused(
    ptr: *const CrystalSimInstance,
    out_paused: *mut bool,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let paused = with_crystal_sim(instance, CrystalSimulation::is_paused)?;
        write_out(out_paused, "out_paused", paused)
    })
}

/// Grid extents. Planar grids report `nz = 1`.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - Every `out_*` pointer must be non-null and writable.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_get_grid_dimensions(
    ptr: *const CrystalSimInstance,
    out_nx: *mut usize,
    out_ny: *mut usize,
    out_nz: *mut usize,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let grid = with_crystal_sim(instance, |sim| *sim.grid())?;
        write_out(out_nx, "out_nx", grid.nx())?;
        write_out(out_ny, "out_ny", grid.ny())?;
        write_out(out_nz, "out_nz", grid.nz())
    })
}

/// Display buffer size in pixels. The buffer holds `width * height * 4` bytes.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_width` and `out_height` must be non-null and writable.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_get_display_dimensions(
    ptr: *const CrystalSimInstance,
    out_width: *mut usize,
    out_height: *mut usize,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let (width, height) = with_crystal_sim(instance, CrystalSimulation::display_dimensions)?;
        write_out(out_width, "out_width", width)?;
        write_out(out_height, "out_height", height)
    })
}

/// Copy the RGBA display buffer (active slice, row-major, alpha 255).
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_rgba` must be null or point to at least `len` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_copy_display(
    ptr: *const CrystalSimInstance,
    out_rgba: *mut u8,
    len: usize,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim(instance, |sim| {
            copy_into(sim.display_buffer(), out_rgba, len, "out_rgba")
        })?
    })
}

/// Copy a full-grid scalar field (`nx * ny * nz` values, x fastest).
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_values` must be null or point to at least `len` writable floats.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_copy_field(
    ptr: *const CrystalSimInstance,
    field: CrystalSimField,
    out_values: *mut f32,
    len: usize,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim(instance, |sim| {
            let values = match field {
                CrystalSimField::Phi => sim.read_phi(),
                CrystalSimField::Temperature => sim.read_temperature(),
                CrystalSimField::Orientation => sim.read_orientation(),
            };
            copy_into(&values[..], out_values, len, "out_values")
        })?
    })
}

/// Statistics as of the last advancing step or reset.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_stats` must be non-null and writable.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_get_stats(
    ptr: *const CrystalSimInstance,
    out_stats: *mut CrystalSimStats,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let stats = with_crystal_sim(instance, |sim| CrystalSimStats::from(sim.stats()))?;
        write_out(out_stats, "out_stats", stats)
    })
}

/// Current camera angles and distance.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_camera` must be non-null and writable.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_get_camera(
    ptr: *const CrystalSimInstance,
    out_camera: *mut CrystalSimCamera,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let camera = with_crystal_sim(instance, |sim| CrystalSimCamera::from(sim.camera()))?;
        write_out(out_camera, "out_camera", camera)
    })
}

/// Camera view matrix as 16 column-major floats.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_matrix` must be null or point to at least `len` writable floats.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_get_view_matrix(
    ptr: *const CrystalSimInstance,
    out_matrix: *mut f32,
    len: usize,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let view = with_crystal_sim(instance, |sim| sim.camera().view_matrix())?;
        copy_into(view.as_slice(), out_matrix, len, "out_matrix")
    })
}
