use narwhal::{Easing, Movement, MovementOptions, vec2};

fn opts(steps: usize, easing: Easing) -> MovementOptions {
    MovementOptions { steps, easing }
}

#[test]
fn movement_reaches_destination_exactly_after_configured_steps() {
    for easing in [Easing::Linear, Easing::Sinusoidal, Easing::EaseOutCubic] {
        let mut m = Movement::new(vec2(0.0, 0.0), vec2(1.0, 1.0), &opts(17, easing));
        let mut last = vec2(0.0, 0.0);
        for _ in 0..17 {
            last = m.next();
        }
        assert_eq!(last, vec2(1.0, 1.0), "{easing:?}");
        assert!(m.is_finished());
        for _ in 0..5 {
            assert_eq!(m.next(), vec2(1.0, 1.0), "{easing:?}");
        }
    }
}

#[test]
fn movement_excludes_start_and_progresses_monotonically() {
    let mut m = Movement::new(vec2(0.0, 0.0), vec2(10.0, 0.0), &MovementOptions::default());
    let first = m.next();
    assert!(first.x > 0.0, "start point must not be yielded again");
    let mut prev = first.x;
    while !m.is_finished() {
        let p = m.next();
        assert!(p.x >= prev);
        assert_eq!(p.y, 0.0);
        prev = p.x;
    }
    assert_eq!(prev, 10.0);
}

#[test]
fn sinusoidal_is_slow_at_both_ends() {
    let mut m = Movement::new(vec2(0.0, 0.0), vec2(1.0, 0.0), &opts(10, Easing::Sinusoidal));
    let points: Vec<f64> = (0..10).map(|_| m.next().x).collect();
    let first_step = points[0];
    let middle_step = points[5] - points[4];
    let last_step = points[9] - points[8];
    assert!(first_step < middle_step);
    assert!(last_step < middle_step);
}

#[test]
fn same_start_and_destination_arrives_in_one_step() {
    let p = vec2(2.0, -3.0);
    let mut m = Movement::new(p, p, &opts(50, Easing::Linear));
    assert_eq!(m.steps(), 1);
    assert!(!m.is_finished());
    assert_eq!(m.next(), p);
    assert!(m.is_finished());
    assert_eq!(m.next(), p);
}

#[test]
fn zero_steps_behaves_like_one() {
    let mut m = Movement::new(vec2(0.0, 0.0), vec2(4.0, 4.0), &opts(0, Easing::Linear));
    assert_eq!(m.next(), vec2(4.0, 4.0));
    assert!(m.is_finished());
}

#[test]
fn movement_is_an_endless_iterator() {
    let m = Movement::new(vec2(0.0, 0.0), vec2(4.0, 0.0), &opts(4, Easing::Linear));
    let points: Vec<_> = m.take(6).collect();
    assert_eq!(
        points,
        vec![
            vec2(1.0, 0.0),
            vec2(2.0, 0.0),
            vec2(3.0, 0.0),
            vec2(4.0, 0.0),
            vec2(4.0, 0.0),
            vec2(4.0, 0.0)
        ]
    );
}
