/// True round start: the timer read `detected_timer` at `detection_time`, so it
/// showed `origin` about `origin - detected_timer` seconds (plus one for the
/// tick already elapsed) earlier.
pub fn backdate(detection_time: f64, detected_timer: u8, origin: u8) -> f64 {
    detection_time - origin.saturating_sub(detected_timer) as f64 - 1.0
}

/// `backdate` clamped to `floor` (sequence origin or the previous round's end).
pub fn backdated_start(detection_time: f64, detected_timer: u8, origin: u8, floor: f64) -> f64 {
    backdate(detection_time, detected_timer, origin)
        .max(floor)
        .min(detection_time)
}
