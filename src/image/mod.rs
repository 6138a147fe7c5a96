pub mod color;
pub mod depth;
pub mod f32;
pub mod io;
pub mod mask;
pub mod traits;

pub use self::color::{ChannelOrder, ColorImage};
pub use self::depth::DepthImage;
pub use self::f32::ImageF32;
pub use self::mask::Mask;
pub use self::traits::{ImageView, Rows};
