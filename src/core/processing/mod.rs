//! Resize plumbing shared by the transforms: backend selection and the
//! size-normalizing dispatch onto `fast_image_resize` or `image::imageops`.
pub mod backend;
pub mod resize;
