use serde::Serialize;

/// Ordered fulfillment stages shown by the order tracker.
pub struct StageDef {
    pub name: &'static str,
    pub description: &'static str,
}

pub const BOOKING_STAGES: [StageDef; 5] = [
    StageDef { name: "Pending", description: "Booking Received" },
    StageDef { name: "Confirmed", description: "Booking Confirmed" },
    StageDef { name: "Shipped", description: "Vehicle Dispatched" },
    StageDef { name: "Delivered", description: "Vehicle Delivered" },
    StageDef { name: "Under Review", description: "Quality Check" },
];

pub const TEST_DRIVE_STAGES: [StageDef; 3] = [
    StageDef { name: "Pending", description: "Request Received" },
    StageDef { name: "Confirmed", description: "Slot Confirmed" },
    StageDef { name: "Completed", description: "Test Drive Completed" },
];

#[derive(Debug, Serialize, PartialEq)]
pub struct StageView {
    pub name: &'static str,
    pub description: &'static str,
    /// True for every stage at or before the current one.
    pub completed: bool,
    pub current: bool,
}

pub fn booking_progress(status: &str) -> Vec<StageView> {
    progress(&BOOKING_STAGES, status)
}

pub fn test_drive_progress(status: &str) -> Vec<StageView> {
    progress(&TEST_DRIVE_STAGES, status)
}

fn progress(stages: &[StageDef], status: &str) -> Vec<StageView> {
    let current = stages.iter().position(|s| s.name == status);
    if current.is_none() {
        tracing::warn!(status, "status not in stage list, rendering all stages pending");
    }

    stages
        .iter()
        .enumerate()
        .map(|(index, stage)| StageView {
            name: stage.name,
            description: stage.description,
            completed: current.map(|c| index <= c).unwrap_or(false),
            current: current == Some(index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_stage_marks_earlier_completed() {
        let stages = booking_progress("Shipped");
        assert_eq!(stages.len(), 5);

        assert!(stages[0].completed && !stages[0].current); // Pending
        assert!(stages[1].completed && !stages[1].current); // Confirmed
        assert!(stages[2].completed && stages[2].current); // Shipped
        assert!(!stages[3].completed && !stages[3].current); // Delivered
        assert!(!stages[4].completed && !stages[4].current); // Under Review
    }

    #[test]
    fn test_first_stage() {
        let stages = booking_progress("Pending");
        assert!(stages[0].completed && stages[0].current);
        assert!(stages[1..].iter().all(|s| !s.completed && !s.current));
    }

    #[test]
    fn test_last_stage_all_completed() {
        let stages = booking_progress("Under Review");
        assert!(stages.iter().all(|s| s.completed));
        assert!(stages[4].current);
    }

    #[test]
    fn test_unknown_status_renders_all_pending() {
        let stages = booking_progress("Teleported");
        assert!(stages.iter().all(|s| !s.completed && !s.current));
    }

    #[test]
    fn test_test_drive_stages() {
        let stages = test_drive_progress("Confirmed");
        assert_eq!(stages.len(), 3);
        assert_eq!(stages[1].description, "Slot Confirmed");
        assert!(stages[1].current);
        assert!(!stages[2].completed);
    }
}
