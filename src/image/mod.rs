pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::io::{GrayImageU8, OutputFormat};
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;
