pub mod enhancer;
pub mod huggingface;
pub mod image_codec;
pub mod palette;
pub mod provider;
pub mod replicate;
