pub mod audit;
pub mod catalog;
pub mod ids;
pub mod reservation;
pub mod schedule;
pub mod space;
pub mod text;
pub mod time;
pub mod weekday;

pub use audit::*;
pub use catalog::*;
pub use ids::*;
pub use reservation::*;
pub use schedule::*;
pub use space::*;
pub use time::*;
pub use weekday::*;
