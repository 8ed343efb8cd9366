//! Editing operations built from the primitive circuit and schematic commands.

pub mod combine_all;
pub mod combine_net_points;
pub mod combine_net_signals;
pub mod place_net_point;

pub use combine_all::CombineAllNetSignalsUnderNetPoint;
pub use combine_net_points::CombineNetPoints;
pub use combine_net_signals::CombineNetSignals;
pub use place_net_point::PlaceNetPointCommand;
