pub mod class_names;
pub mod patch_grid;
pub mod plot_grid;
