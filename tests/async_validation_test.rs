// Import the library functions
use geometry_validator::{
    begin_validation, begin_validation_with_rules, validate_sync, validate_sync_with_rules, ErrorKind,
    Geometry, Part, Point, Ring, RunStatus, ValidationEvent, ValidationRules, ValidationRun,
    ValidatorError,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed zigzag whose teeth all cross the return edge
    fn zigzag(teeth: usize) -> Ring {
        let mut points = Vec::with_capacity(2 * teeth + 3);
        for i in 0..teeth {
            let x = i as f64;
            points.push(Point::new(x, 0.0));
            points.push(Point::new(x + 0.5, 10.0));
        }
        points.push(Point::new(teeth as f64, 5.0));
        points.push(Point::new(-1.0, 5.0));
        points.push(Point::new(0.0, 0.0));
        Ring::new(points)
    }

    fn large_invalid_geometry() -> Geometry {
        Geometry::simple_polygon(zigzag(20_000))
    }

    fn mixed_geometry() -> Geometry {
        Geometry::polygon(vec![
            Part::polygon(
                Ring::from_coords(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]),
                vec![
                    Ring::from_coords(&[(1.0, 1.0), (1.0, 5.0), (5.0, 5.0), (5.0, 1.0), (1.0, 1.0)]),
                    Ring::from_coords(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0), (3.0, 3.0)]),
                ],
            ),
            Part::polygon(
                Ring::from_coords(&[(20.0, 0.0), (30.0, 10.0), (30.0, 0.0), (20.0, 10.0), (20.0, 0.0)]),
                vec![],
            ),
            Part::polygon(zigzag(50), vec![]),
        ])
    }

    #[test]
    fn test_finished_run_matches_sync() {
        let geometry = mixed_geometry();
        let expected = validate_sync(&geometry).unwrap();
        assert!(expected.len() > 3);

        let outcome = begin_validation(geometry).unwrap().wait();
        assert_eq!(outcome.status(), RunStatus::Finished);
        assert_eq!(outcome.summary.error_count, expected.len());
        assert_eq!(outcome.errors, expected);
    }

    #[test]
    fn test_event_stream_matches_sync() {
        let geometry = mixed_geometry();
        let expected = validate_sync(&geometry).unwrap();

        let mut handle = begin_validation(geometry).unwrap();
        let mut found = Vec::new();
        let mut terminal = Vec::new();
        while let Some(event) = handle.next_event() {
            match event {
                ValidationEvent::ErrorFound(error) => {
                    assert!(terminal.is_empty(), "error published after terminal event");
                    found.push(error);
                }
                other => terminal.push(other),
            }
        }

        assert_eq!(found, expected);
        assert_eq!(terminal.len(), 1);
        assert!(matches!(&terminal[0], ValidationEvent::Finished(s) if s.error_count == expected.len()));
        assert_eq!(handle.errors(), expected.as_slice());
    }

    #[test]
    fn test_cancel_immediately_after_start() {
        let mut handle = begin_validation(large_invalid_geometry()).unwrap();
        handle.cancel();
        assert_eq!(handle.status(), RunStatus::Cancelled);
        assert!(handle.is_finished());

        // Everything published before cancel() returned is all there will be
        let seen = handle.errors().len();
        handle.cancel();
        assert_eq!(handle.status(), RunStatus::Cancelled);

        let outcome = handle.wait();
        assert_eq!(outcome.status(), RunStatus::Cancelled);
        assert_eq!(outcome.summary.error_count, outcome.errors.len());
        assert!(outcome.errors.len() >= seen);
        assert!(outcome.errors.iter().all(|e| e.kind == ErrorKind::SelfIntersection));
        assert_eq!(outcome.summary.message(), "Geometry validation was aborted.");
    }

    #[test]
    fn test_cancelled_errors_are_a_prefix_of_sync() {
        let geometry = Geometry::simple_polygon(zigzag(300));
        let expected = validate_sync(&geometry).unwrap();

        let mut handle = begin_validation(geometry).unwrap();
        let _ = handle.next_event();
        handle.cancel();
        let mut events = Vec::new();
        while let Some(event) = handle.next_event() {
            events.push(event);
        }
        let outcome = handle.wait();

        assert!(outcome.errors.len() <= expected.len());
        assert_eq!(outcome.errors.as_slice(), &expected[..outcome.errors.len()]);
        assert!(matches!(
            events.last(),
            Some(ValidationEvent::Cancelled(_)) | Some(ValidationEvent::Finished(_))
        ));
    }

    #[test]
    fn test_dropping_handle_stops_worker() {
        let handle = begin_validation(large_invalid_geometry()).unwrap();
        drop(handle);
    }

    #[test]
    fn test_run_lifecycle() {
        let mut run = ValidationRun::new(mixed_geometry()).unwrap();
        assert_eq!(run.status(), RunStatus::Idle);

        let handle = run.start().unwrap();
        assert!(matches!(run.start(), Err(ValidatorError::AlreadyStarted)));

        let outcome = handle.wait();
        assert_eq!(outcome.status(), RunStatus::Finished);
        assert_eq!(run.status(), RunStatus::Finished);
    }

    #[test]
    fn test_rules_reach_the_worker() {
        let geometry = Geometry::polygon(vec![
            Part::polygon(Ring::from_coords(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]), vec![]),
            Part::polygon(Ring::from_coords(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)]), vec![]),
        ]);
        let rules = ValidationRules {
            spatial_index_threshold: 0,
            check_part_nesting: false,
        };
        let outcome = begin_validation_with_rules(geometry.clone(), rules.clone()).unwrap().wait();
        assert!(outcome.is_valid());
        assert_eq!(outcome.errors, validate_sync_with_rules(&geometry, &rules).unwrap());

        let outcome = begin_validation(geometry).unwrap().wait();
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_malformed_geometry_never_starts() {
        let geometry = Geometry::polygon(vec![Part::default()]);
        assert!(matches!(begin_validation(geometry), Err(ValidatorError::EmptyPart { part: 0 })));
    }
}
