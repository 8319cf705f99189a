mod release;

pub use release::{ReleaseArgs, release};
