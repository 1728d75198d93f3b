use crate::gtfs::{GtfsRoute, GtfsShape, GtfsStop, GtfsStopTime, GtfsTrip};

/// Every table the pipeline reads, in file order.
#[derive(Default, Debug, Clone)]
pub struct Feed {
    pub routes: Vec<GtfsRoute>,
    pub trips: Vec<GtfsTrip>,
    pub shapes: Vec<GtfsShape>,
    pub stops: Vec<GtfsStop>,
    pub stop_times: Vec<GtfsStopTime>,
}
