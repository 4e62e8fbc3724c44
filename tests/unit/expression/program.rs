use super::*;

#[test]
fn constant_programs_evaluate_to_255_for_all_channels() {
    let programs = ChannelPrograms::parse(&ChannelSources::uniform("255")).unwrap();
    for (x, y) in [(0, 0), (5, 9), (640, 480)] {
        assert_eq!(
            programs.eval_rgba(&Bindings::new(x, y)).unwrap(),
            [255, 255, 255, 255]
        );
    }
}

#[test]
fn channels_keep_rgba_order() {
    let sources = ChannelSources {
        red: "1".to_owned(),
        green: "2".to_owned(),
        blue: "x".to_owned(),
        alpha: "y + 256".to_owned(),
    };
    let programs = ChannelPrograms::parse(&sources).unwrap();
    assert_eq!(programs.get(Channel::Blue).source, "x");
    assert_eq!(
        programs.eval_rgba(&Bindings::new(3, 4)).unwrap(),
        [1, 2, 3, 4]
    );
}

#[test]
fn parse_failure_names_channel_and_text() {
    let sources = ChannelSources {
        red: "x".to_owned(),
        green: "y".to_owned(),
        blue: "x +* y".to_owned(),
        alpha: "255".to_owned(),
    };
    let err = ChannelPrograms::parse(&sources).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("config error:"), "{msg}");
    assert!(msg.contains("blue"), "{msg}");
    assert!(msg.contains("x +* y"), "{msg}");
}

#[test]
fn eval_failure_reports_first_failing_channel() {
    let sources = ChannelSources {
        red: "x".to_owned(),
        green: "q".to_owned(),
        blue: "w".to_owned(),
        alpha: "255".to_owned(),
    };
    let programs = ChannelPrograms::parse(&sources).unwrap();
    let (channel, err) = programs.eval_rgba(&Bindings::new(0, 0)).unwrap_err();
    assert_eq!(channel, Channel::Green);
    assert_eq!(err.subexpr, "q");
}
