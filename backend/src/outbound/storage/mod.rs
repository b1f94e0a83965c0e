//! Filesystem adapters.

mod cap_std_id_image_store;

pub use cap_std_id_image_store::CapStdIdImageStore;
