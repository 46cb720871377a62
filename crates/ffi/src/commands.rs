//! Commands that mutate the simulation (write lock)

use crystal_sim_core::CrystalSimulation;

use crate::error::CrystalSimErrorCode;
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_crystal_sim_mut};
use crate::instance::CrystalSimInstance;

/// Run one batch of sub-steps and republish the display buffer.
///
/// While paused this is a no-op. `out_advanced` (optional) receives whether
/// the fields advanced.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_advanced` must be null or point to writable memory.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_step(
    ptr: *const CrystalSimInstance,
    out_advanced: *mut bool,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let advanced = with_crystal_sim_mut(instance, CrystalSimulation::step)?;
        if !out_advanced.is_null() {
            // SAFETY: non-null and writable per contract.
            unsafe {
                *out_advanced = advanced;
            }
        }
        Ok(())
    })
}

/// Reinitialize every field and reseed the nucleus. Pause state and camera are kept.
///
/// # Safety
/// `ptr` must be null or a live instance from `crystal_sim_new`.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_reset(ptr: *const CrystalSimInstance) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim_mut(instance, CrystalSimulation::reset)
    })
}

/// Flip run/pause state.
///
/// # Safety
/// `ptr` must be null or a live instance from `crystal_sim_new`.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_toggle_pause(
    ptr: *const CrystalSimInstance,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim_mut(instance, CrystalSimulation::toggle_pause)
    })
}

/// Set every orientation angle to 0.
///
/// # Safety
/// `ptr` must be null or a live instance from `crystal_sim_new`.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_set_orientation_uniform(
    ptr: *const CrystalSimInstance,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim_mut(instance, CrystalSimulation::set_orientation_uniform)
    })
}

/// Regenerate the orientation field as a vortex around the grid center.
///
/// # Safety
/// `ptr` must be null or a live instance from `crystal_sim_new`.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_set_orientation_vortex(
    ptr: *const CrystalSimInstance,
    clockwise: bool,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim_mut(instance, |sim| sim.set_orientation_vortex(clockwise))
    })
}

/// Blend `angle` (radians) into the orientation field around a screen position.
///
/// `radius` is in screen units, clamped to `[1, 400]`; `blend` is clamped to
/// `[0, 1]`. Positions outside the grid are ignored. `out_cells` (optional)
/// receives the number of grid columns touched.
///
/// # Safety
/// - `ptr` must be null or a live instance from `crystal_sim_new`.
/// - `out_cells` must be null or point to writable memory.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_paint_orientation(
    ptr: *const CrystalSimInstance,
    screen_x: f32,
    screen_y: f32,
    angle: f32,
    radius: f32,
    blend: f32,
    out_cells: *mut usize,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let touched = with_crystal_sim_mut(instance, |sim| {
            sim.paint_orientation(screen_x, screen_y, angle, radius, blend)
        })?;
        if !out_cells.is_null() {
            // SAFETY: non-null and writable per contract.
            unsafe {
                *out_cells = touched;
            }
        }
        Ok(())
    })
}

/// Orbit the camera by degree deltas (yaw, pitch). Pitch is clamped to ±85°.
///
/// # Safety
/// `ptr` must be null or a live instance from `crystal_sim_new`.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_rotate_camera(
    ptr: *const CrystalSimInstance,
    delta_x: f32,
    delta_y: f32,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim_mut(instance, |sim| sim.rotate_camera(delta_x, delta_y))
    })
}

/// Change camera distance by `delta`, clamped to `[0.5, 15]`.
///
/// # Safety
/// `ptr` must be null or a live instance from `crystal_sim_new`.
#[no_mangle]
pub unsafe extern "C" fn crystal_sim_zoom_camera(
    ptr: *const CrystalSimInstance,
    delta: f32,
) -> CrystalSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_crystal_sim_mut(instance, |sim| sim.zoom_camera(delta))
    })
}
