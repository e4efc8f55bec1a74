//! End-to-end scenarios exercising `Timeboard` construction, duty-aware
//! interval arithmetic, and recursive organizer label assignment through
//! the public API only.

use workcal::civil::Timestamp;
use workcal::{
    Amendments, CalendarFreq, Closed, Duty, ErrorKind, Frame, IntervalSpec, Label, LabelPattern,
    Marker, Organizer, StructureElement, Timeboard, TimeboardConfig, Timeline, WorkshiftRef,
};

fn ts(y: i32, m: u8, d: u8) -> Timestamp {
    Timestamp::new(y, m, d, 0, 0, 0).unwrap()
}

fn odd_even_organizer() -> Organizer {
    Organizer::new(
        Marker::explicit(vec![]),
        vec![StructureElement::Labels(LabelPattern::list(vec![
            Label::Int(0),
            Label::Int(1),
        ]))],
    )
    .unwrap()
}

#[test]
fn odd_even_days_count_and_first_in_window() {
    let freq: CalendarFreq = "D".parse().unwrap();
    let organizer = odd_even_organizer();
    let config = TimeboardConfig::new(freq, ts(2017, 9, 30), ts(2017, 10, 15));
    let board = Timeboard::new(config, &organizer).unwrap();

    let window = board
        .get_interval(
            IntervalSpec::Timestamps(ts(2017, 10, 2), ts(2017, 10, 8)),
            Closed::both(),
            None,
        )
        .unwrap();

    assert_eq!(window.count(Duty::On), 3);
    assert_eq!(
        window.first(Duty::On).unwrap().start_time(),
        ts(2017, 10, 3)
    );
    assert_eq!(
        window.first(Duty::Off).unwrap().start_time(),
        ts(2017, 10, 2)
    );
}

#[test]
fn rollforward_and_rollback_locate_duty_anchors() {
    let freq: CalendarFreq = "D".parse().unwrap();
    let organizer = odd_even_organizer();
    let config = TimeboardConfig::new(freq, ts(2017, 9, 30), ts(2017, 10, 15));
    let board = Timeboard::new(config, &organizer).unwrap();

    let ws = board.get_workshift(ts(2017, 10, 6), None).unwrap();
    assert!(!ws.is_on_duty());

    let forward_anchor = ws.rollforward(0, Duty::On).unwrap();
    assert_eq!(forward_anchor.start_time(), ts(2017, 10, 7));

    let one_before_forward_anchor = ws.rollforward(-1, Duty::On).unwrap();
    assert_eq!(one_before_forward_anchor.start_time(), ts(2017, 10, 5));

    let rolled_back = ws.sub(1).unwrap();
    assert_eq!(rolled_back.start_time(), ts(2017, 10, 3));
}

fn weekly_five_by_eight_board() -> Timeboard {
    let day: CalendarFreq = "D".parse().unwrap();
    let week: CalendarFreq = "W".parse().unwrap();
    let organizer = Organizer::new(
        Marker::periodic(week),
        vec![StructureElement::Labels(LabelPattern::list(vec![
            Label::Int(1),
            Label::Int(1),
            Label::Int(1),
            Label::Int(1),
            Label::Int(1),
            Label::Int(0),
            Label::Int(0),
        ]))],
    )
    .unwrap();

    let mut amendments = Amendments::new();
    let mut day_cursor = ts(2017, 1, 1);
    for _ in 0..10 {
        amendments.insert(day_cursor, Label::Int(0));
        day_cursor = day_cursor.add_days(1);
    }

    let mut config = TimeboardConfig::new(day, ts(2016, 11, 28), ts(2017, 5, 2));
    config.amendments = amendments;
    Timeboard::new(config, &organizer).unwrap()
}

#[test]
fn weekly_five_by_eight_respects_amendments() {
    let board = weekly_five_by_eight_board();
    assert!(board
        .get_workshift(ts(2017, 1, 11), None)
        .unwrap()
        .is_on_duty());
    assert!(!board
        .get_workshift(ts(2017, 1, 10), None)
        .unwrap()
        .is_on_duty());
}

#[test]
fn fractional_month_count_periods() {
    let board = weekly_five_by_eight_board();
    let month: CalendarFreq = "M".parse().unwrap();
    let window = board
        .get_interval(
            IntervalSpec::Timestamps(ts(2016, 12, 29), ts(2017, 4, 1)),
            Closed::both(),
            None,
        )
        .unwrap();

    let on = window.count_periods(month, Duty::On).unwrap();
    assert!((on - (2.0 / 22.0 + 3.0)).abs() < 1e-9);

    let off = window.count_periods(month, Duty::Off).unwrap();
    assert!((off - (1.0 / 9.0 + 3.0 + 1.0 / 10.0)).abs() < 1e-9);

    let any = window.count_periods(month, Duty::Any).unwrap();
    assert!((any - (3.0 / 31.0 + 3.0 + 1.0 / 30.0)).abs() < 1e-9);
}

#[test]
fn compound_shifts_collapse_scalar_runs() {
    let day: CalendarFreq = "D".parse().unwrap();
    let week: CalendarFreq = "W".parse().unwrap();
    let organizer = Organizer::new(
        Marker::periodic(week),
        vec![
            StructureElement::Labels(LabelPattern::scalar(Label::Int(100))),
            StructureElement::Labels(LabelPattern::list(vec![
                Label::Int(0),
                Label::Int(0),
                Label::Int(1),
                Label::Int(1),
            ])),
        ],
    )
    .unwrap();
    let frame = Frame::new(day, ts(2016, 12, 31), ts(2017, 1, 12)).unwrap();
    let timeline = Timeline::build(frame, &organizer, &[], false, WorkshiftRef::Start).unwrap();

    let position = timeline.workshift_containing(ts(2017, 1, 11)).unwrap();
    assert_eq!(timeline.duration(position), 4);
    assert!(matches!(timeline.label(position), Label::Int(100)));
    assert_eq!(timeline.workshift_start_time(position), ts(2017, 1, 9));
    assert_eq!(timeline.workshift_end_time(position).date(), (2017, 1, 12));
}

fn labels_match(a: Label, b: Label) -> bool {
    match (a, b) {
        (Label::Text(x), Label::Text(y)) => x == y,
        (Label::Int(x), Label::Int(y)) => x == y,
        _ => false,
    }
}

#[test]
fn recursive_organizer_produces_expected_label_sequence() {
    let day: CalendarFreq = "D".parse().unwrap();
    let month: CalendarFreq = "M".parse().unwrap();
    let week: CalendarFreq = "W".parse().unwrap();

    let inner1 = Organizer::new(
        Marker::explicit(vec![ts(2016, 12, 30)]),
        vec![
            StructureElement::Labels(LabelPattern::list(vec![
                Label::text("a").unwrap(),
                Label::text("b").unwrap(),
            ])),
            StructureElement::Labels(LabelPattern::list(vec![Label::text("x").unwrap()])),
        ],
    )
    .unwrap();
    let inner2 = Organizer::new(
        Marker::periodic(week),
        vec![StructureElement::Labels(LabelPattern::list(vec![
            Label::Int(1),
            Label::Int(2),
            Label::Int(3),
        ]))],
    )
    .unwrap();
    let outer = Organizer::new(
        Marker::periodic(month),
        vec![
            StructureElement::Nested(Box::new(inner1)),
            StructureElement::Nested(Box::new(inner2)),
        ],
    )
    .unwrap();

    let frame = Frame::new(day, ts(2016, 12, 27), ts(2017, 1, 5)).unwrap();
    let timeline = Timeline::build(frame, &outer, &[], false, WorkshiftRef::Start).unwrap();

    let expected = [
        Label::text("a").unwrap(),
        Label::text("b").unwrap(),
        Label::text("a").unwrap(),
        Label::text("x").unwrap(),
        Label::text("x").unwrap(),
        Label::Int(1),
        Label::Int(1),
        Label::Int(2),
        Label::Int(3),
        Label::Int(1),
    ];
    assert_eq!(timeline.len(), expected.len());
    for (position, want) in expected.iter().enumerate() {
        assert!(labels_match(timeline.label(position), *want));
    }
}

#[test]
fn partial_out_of_bounds_period_requires_clipping() {
    let freq: CalendarFreq = "D".parse().unwrap();
    let organizer = Organizer::new(
        Marker::explicit(vec![]),
        vec![StructureElement::Labels(LabelPattern::scalar(Label::Bool(
            true,
        )))],
    )
    .unwrap();
    let config = TimeboardConfig::new(freq, ts(2017, 1, 1), ts(2017, 1, 31));
    let board = Timeboard::new(config, &organizer).unwrap();

    let fiscal_year: CalendarFreq = "A-MAR".parse().unwrap();

    let err = board
        .get_interval(
            IntervalSpec::Period {
                ts: ts(2017, 1, 15),
                freq: fiscal_year,
                clip_period: false,
            },
            Closed::both(),
            None,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);

    let clipped = board
        .get_interval(
            IntervalSpec::Period {
                ts: ts(2017, 1, 15),
                freq: fiscal_year,
                clip_period: true,
            },
            Closed::both(),
            None,
        )
        .unwrap();
    assert_eq!(clipped.first_position(), 0);
    assert_eq!(clipped.last_position(), board.timeline().len() - 1);
}

#[test]
fn what_portion_of_reflects_overlap_fraction() {
    let board = weekly_five_by_eight_board();
    let whole = board
        .get_interval(IntervalSpec::Whole, Closed::both(), None)
        .unwrap();
    let january = board
        .get_interval(
            IntervalSpec::Timestamps(ts(2017, 1, 1), ts(2017, 1, 31)),
            Closed::both(),
            None,
        )
        .unwrap();
    let ratio = january.what_portion_of(&whole, Duty::On);
    assert!(ratio > 0.0 && ratio < 1.0);
}
