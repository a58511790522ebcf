pub mod bouncing_ball;
pub mod dahlquist;
pub mod feedthrough;

pub use bouncing_ball::{BouncingBall, BouncingBallFactory, BouncingBallParameters};
pub use dahlquist::{Dahlquist, DahlquistFactory, DahlquistParameters};
pub use feedthrough::{Feedthrough, FeedthroughFactory};
