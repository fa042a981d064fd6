//! Image processing operators used by the offload pipeline.

pub mod crop;
pub mod normalization;
pub mod resize;
pub mod topk;

pub use crop::CenterCrop;
pub use normalization::{ChannelOrder, NormalizeImage};
pub use resize::ResizeShortest;
pub use topk::{Topk, TopkResult};
