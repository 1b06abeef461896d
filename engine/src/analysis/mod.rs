// Per-ticker estimators built on the indicator frame
pub mod ceiling;
pub mod directional;
pub mod session;
pub mod targets;
pub mod ticker;

pub use ceiling::{ceiling_score, intraday_ceiling, CeilingOutlook, CeilingScore, IntradayCeiling};
pub use directional::{DirectionalEstimate, DirectionalOutlook};
pub use session::{session_move, SessionMove};
pub use targets::{TargetCalculator, TargetSet, TrendLabel};
pub use ticker::{analyze, TickerAnalysis};
