//! C ABI for the crystal growth simulation
//!
//! Every function takes an opaque `CrystalSimInstance*` created by
//! `crystal_sim_new` and returns a `CrystalSimErrorCode`. On failure a
//! description is available from `crystal_sim_get_last_error()` on the same
//! thread. The C header is generated by `build.rs` into `CrystalSimFFI.h`.

mod commands;
mod error;
mod helpers;
mod instance;
mod queries;

pub use commands::{
    crystal_sim_paint_orientation, crystal_sim_reset, crystal_sim_rotate_camera,
    crystal_sim_set_orientation_uniform, crystal_sim_set_orientation_vortex, crystal_sim_step,
    crystal_sim_toggle_pause, crystal_sim_zoom_camera,
};
pub use error::{crystal_sim_get_last_error, crystal_sim_get_last_error_code, CrystalSimErrorCode};
pub use instance::{
    crystal_sim_default_config, crystal_sim_destroy, crystal_sim_new, CrystalSimBoundary,
    CrystalSimConfig, CrystalSimInstance, CrystalSimNucleus,
};
pub use queries::{
    crystal_sim_copy_display, crystal_sim_copy_field, crystal_sim_get_camera,
    crystal_sim_get_display_dimensions, crystal_sim_get_grid_dimensions, crystal_sim_get_stats,
    crystal_sim_get_view_matrix, crystal_sim_is_paused, CrystalSimCamera, CrystalSimField,
    CrystalSimStats,
};
