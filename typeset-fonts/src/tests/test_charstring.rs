use pretty_assertions::assert_eq;
use types::PenCommand;

use super::*;

const HSTEMHM: &[u8] = &[18];
const HINTMASK: &[u8] = &[19];
const RMOVETO: &[u8] = &[21];
const HMOVETO: &[u8] = &[22];
const RLINETO: &[u8] = &[5];
const HLINETO: &[u8] = &[6];
const VLINETO: &[u8] = &[7];
const CALLSUBR: &[u8] = &[10];
const CALLGSUBR: &[u8] = &[29];
const RETURN: &[u8] = &[11];
const ENDCHAR: &[u8] = &[14];
const HVCURVETO: &[u8] = &[31];
const VHCURVETO: &[u8] = &[30];
const ADD: &[u8] = &[12, 10];
const MUL: &[u8] = &[12, 24];
const PUT: &[u8] = &[12, 20];
const GET: &[u8] = &[12, 21];
const IFELSE: &[u8] = &[12, 22];
const RANDOM: &[u8] = &[12, 23];
const HFLEX: &[u8] = &[12, 34];
const DOTSECTION: &[u8] = &[12, 0];

/// Encodes an integer operand.
fn n(value: i32) -> Vec<u8> {
    match value {
        -107..=107 => vec![(value + 139) as u8],
        _ => {
            let [hi, lo] = (value as i16).to_be_bytes();
            vec![28, hi, lo]
        }
    }
}

/// Concatenates encoded operands and operators.
fn program(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

/// Builds an INDEX with a one byte offset size.
fn make_index(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = (objects.len() as u16).to_be_bytes().to_vec();
    buf.push(1);
    let mut offset = 1u8;
    buf.push(offset);
    for object in objects {
        offset += object.len() as u8;
        buf.push(offset);
    }
    buf.extend(objects.concat());
    buf
}

fn fixed(values: &[i32]) -> Vec<Fixed> {
    values.iter().copied().map(Fixed::from_i32).collect()
}

fn command(operator: Operator, operands: &[i32]) -> Command {
    Command::new(operator, fixed(operands))
}

fn decode_simple(data: &[u8]) -> Result<CharString, Error> {
    decode(data, Index::default(), None)
}

#[test]
fn width_and_lines() {
    let data = program(&[
        &n(50),
        &n(10),
        &n(20),
        RMOVETO,
        &n(100),
        HLINETO,
        &n(200),
        VLINETO,
        ENDCHAR,
    ]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(charstring.width(), Some(Fixed::from_i32(50)));
    assert_eq!(
        charstring.commands(),
        &[
            command(Operator::RMoveTo, &[10, 20]),
            command(Operator::HLineTo, &[100]),
            command(Operator::VLineTo, &[200]),
            command(Operator::EndChar, &[]),
        ]
    );
    let mut pen: Vec<PenCommand> = Vec::new();
    charstring.draw(&mut pen).unwrap();
    assert_eq!(
        pen,
        [
            PenCommand::MoveTo { x: 10.0, y: 20.0 },
            PenCommand::LineTo { x: 110.0, y: 20.0 },
            PenCommand::LineTo { x: 110.0, y: 220.0 },
            PenCommand::Close,
        ]
    );
    let bounds = charstring.bounds().unwrap().unwrap();
    assert_eq!(
        (bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max),
        (10.0, 20.0, 110.0, 220.0)
    );
    assert_eq!(
        charstring.advance_width(Fixed::from_i32(500), Fixed::from_i32(600)),
        Fixed::from_i32(650)
    );
}

#[test]
fn default_width_when_absent() {
    let data = program(&[&n(10), HMOVETO, ENDCHAR]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(charstring.width(), None);
    assert_eq!(
        charstring.advance_width(Fixed::from_i32(500), Fixed::from_i32(600)),
        Fixed::from_i32(500)
    );
}

#[test]
fn endchar_width() {
    let charstring = decode_simple(&program(&[&n(-20), ENDCHAR])).unwrap();
    assert_eq!(charstring.width(), Some(Fixed::from_i32(-20)));
    assert_eq!(charstring.commands(), &[command(Operator::EndChar, &[])]);
    assert_eq!(charstring.bounds().unwrap(), None);
}

#[test]
fn subroutines_are_inlined() {
    let global_subrs = make_index(&[program(&[&n(5), &n(6), RLINETO, RETURN])]);
    let local_subrs = make_index(&[program(&[&n(-107), CALLGSUBR, &n(7), HLINETO, RETURN])]);
    let global_subrs = Index::new(&global_subrs).unwrap();
    let local_subrs = Index::new(&local_subrs).unwrap();
    let data = program(&[&n(0), &n(0), RMOVETO, &n(-107), CALLSUBR, ENDCHAR]);
    let charstring = decode(&data, global_subrs, Some(local_subrs)).unwrap();
    assert_eq!(
        charstring.commands(),
        &[
            command(Operator::RMoveTo, &[0, 0]),
            command(Operator::RLineTo, &[5, 6]),
            command(Operator::HLineTo, &[7]),
            command(Operator::EndChar, &[]),
        ]
    );
}

#[test]
fn decoding_is_deterministic() {
    let subrs = make_index(&[program(&[&n(1), &n(2), RLINETO, RETURN])]);
    let subrs = Index::new(&subrs).unwrap();
    let data = program(&[&n(0), HMOVETO, &n(-107), CALLSUBR, ENDCHAR]);
    let first = decode(&data, Index::default(), Some(subrs)).unwrap();
    let second = decode(&data, Index::default(), Some(subrs)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn top_level_return_is_materialized() {
    let data = program(&[
        &n(10),
        &n(20),
        &n(30),
        &n(40),
        VHCURVETO,
        RETURN,
        &n(1),
        HLINETO,
    ]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(
        charstring.commands(),
        &[
            command(Operator::VhCurveTo, &[10, 20, 30, 40]),
            command(Operator::Return, &[]),
        ]
    );
}

#[test]
fn missing_endchar_is_accepted() {
    let data = program(&[&n(0), &n(0), RMOVETO, &n(10), &n(10), RLINETO]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(charstring.commands().len(), 2);
    let mut pen: Vec<PenCommand> = Vec::new();
    charstring.draw(&mut pen).unwrap();
    assert_eq!(pen.last(), Some(&PenCommand::Close));
}

#[test]
fn recursive_subroutine_exceeds_nesting_limit() {
    let _ = env_logger::builder().is_test(true).try_init();
    let subrs = make_index(&[program(&[&n(-107), CALLSUBR])]);
    let subrs = Index::new(&subrs).unwrap();
    let data = program(&[&n(-107), CALLSUBR, ENDCHAR]);
    for _ in 0..2 {
        assert_eq!(
            decode(&data, Index::default(), Some(subrs)),
            Err(Error::NestingDepthExceeded)
        );
    }
}

#[test]
fn nesting_at_the_limit_is_allowed() {
    // ten chained subroutines, the last of which draws a line
    let mut objects = Vec::new();
    for i in 0..9 {
        objects.push(program(&[&n(i + 1 - 107), CALLSUBR, RETURN]));
    }
    objects.push(program(&[&n(3), &n(4), RLINETO, RETURN]));
    let subrs = make_index(&objects);
    let subrs = Index::new(&subrs).unwrap();
    let data = program(&[&n(0), HMOVETO, &n(-107), CALLSUBR, ENDCHAR]);
    let charstring = decode(&data, Index::default(), Some(subrs)).unwrap();
    assert_eq!(charstring.commands()[1], command(Operator::RLineTo, &[3, 4]));
}

#[test]
fn subroutine_errors() {
    let subrs = make_index(&[program(&[RETURN])]);
    let subrs = Index::new(&subrs).unwrap();
    let out_of_range = program(&[&n(-106), CALLSUBR]);
    assert_eq!(
        decode(&out_of_range, Index::default(), Some(subrs)),
        Err(Error::InvalidSubroutineIndex(1))
    );
    assert_eq!(
        decode(&out_of_range, Index::default(), None),
        Err(Error::MissingSubroutines)
    );
    let global = program(&[&n(0), CALLGSUBR]);
    assert_eq!(
        decode_simple(&global),
        Err(Error::InvalidSubroutineIndex(107))
    );
}

#[test]
fn stack_limits() {
    let mut data = Vec::new();
    for i in 0..49 {
        data.extend(n(i));
    }
    assert_eq!(decode_simple(&data), Err(Error::StackOverflow));
    assert_eq!(
        decode_simple(&program(&[ADD])),
        Err(Error::StackUnderflow)
    );
}

#[test]
fn invalid_operators() {
    assert_eq!(
        decode_simple(&program(&[&n(1), RANDOM])),
        Err(Error::InvalidEscapedOperator(23))
    );
    assert_eq!(
        decode_simple(&program(&[&[2u8]])),
        Err(Error::InvalidOperator(2))
    );
    assert_eq!(
        decode_simple(&program(&[&n(0), HMOVETO, &n(1), &n(2), &n(3), RLINETO])),
        Err(Error::InvalidArgumentCount {
            operator: Operator::RLineTo,
            count: 3
        })
    );
}

#[test]
fn arithmetic_is_evaluated() {
    // (3 + 4) * 2 hmoveto, then a stored value selected by ifelse
    let data = program(&[
        &n(3),
        &n(4),
        ADD,
        &n(2),
        MUL,
        HMOVETO,
        &n(25),
        &n(0),
        PUT,
        &n(0),
        GET,
        &n(-5),
        &n(1),
        &n(2),
        IFELSE,
        HLINETO,
        ENDCHAR,
    ]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(
        charstring.commands(),
        &[
            command(Operator::HMoveTo, &[14]),
            command(Operator::HLineTo, &[25]),
            command(Operator::EndChar, &[]),
        ]
    );
}

#[test]
fn hint_masks() {
    let data = program(&[
        &n(0),
        &n(10),
        &n(20),
        &n(10),
        HSTEMHM,
        &n(30),
        &n(10),
        HINTMASK,
        &[0b1110_0000],
        &n(0),
        &n(0),
        RMOVETO,
        ENDCHAR,
    ]);
    let charstring = decode_simple(&data).unwrap();
    let commands = charstring.commands();
    assert_eq!(commands[0], command(Operator::HStemHm, &[0, 10, 20, 10]));
    assert_eq!(commands[1].operator, Operator::HintMask);
    assert_eq!(commands[1].operands, fixed(&[30, 10]));
    assert_eq!(commands[1].mask, [0b1110_0000]);
    assert_eq!(commands[2], command(Operator::RMoveTo, &[0, 0]));
    assert_eq!(charstring.width(), None);
}

#[test]
fn alternating_curves() {
    let data = program(&[
        &n(0),
        &n(0),
        RMOVETO,
        &n(10),
        &n(20),
        &n(30),
        &n(40),
        HVCURVETO,
        ENDCHAR,
    ]);
    let mut pen: Vec<PenCommand> = Vec::new();
    decode_simple(&data).unwrap().draw(&mut pen).unwrap();
    assert_eq!(
        pen[1],
        PenCommand::CurveTo {
            cx0: 10.0,
            cy0: 0.0,
            cx1: 30.0,
            cy1: 30.0,
            x: 30.0,
            y: 70.0
        }
    );
}

#[test]
fn two_byte_operands() {
    // 247..=250 encode 108..=1131, 251..=254 encode -108..=-1131
    let data = program(&[
        &[247, 0],
        &[251, 0],
        RMOVETO,
        &[250, 255],
        HLINETO,
        &[254, 255],
        VLINETO,
        &[248, 10],
        HLINETO,
        ENDCHAR,
    ]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(
        charstring.commands(),
        &[
            command(Operator::RMoveTo, &[108, -108]),
            command(Operator::HLineTo, &[1131]),
            command(Operator::VLineTo, &[-1131]),
            command(Operator::HLineTo, &[374]),
            command(Operator::EndChar, &[]),
        ]
    );
}

#[test]
fn fixed_operands() {
    let data = program(&[
        &n(0),
        HMOVETO,
        &[255, 0x00, 0x01, 0x80, 0x00],
        HLINETO,
        &[255, 0xFF, 0xFF, 0x80, 0x00],
        VLINETO,
        ENDCHAR,
    ]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(
        charstring.commands()[1..3],
        [
            Command::new(Operator::HLineTo, [Fixed::from_f64(1.5)]),
            Command::new(Operator::VLineTo, [Fixed::from_f64(-0.5)]),
        ]
    );
    let mut pen: Vec<PenCommand> = Vec::new();
    charstring.draw(&mut pen).unwrap();
    assert_eq!(
        pen[1..3],
        [
            PenCommand::LineTo { x: 1.5, y: 0.0 },
            PenCommand::LineTo { x: 1.5, y: -0.5 },
        ]
    );
}

#[test]
fn alternating_curves_with_final_operand() {
    let data = program(&[
        &n(0),
        &n(0),
        RMOVETO,
        &n(10),
        &n(20),
        &n(30),
        &n(40),
        &n(50),
        &n(60),
        &n(70),
        &n(80),
        &n(5),
        HVCURVETO,
        ENDCHAR,
    ]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(
        charstring.commands()[1],
        command(Operator::HvCurveTo, &[10, 20, 30, 40, 50, 60, 70, 80, 5])
    );
    let mut pen: Vec<PenCommand> = Vec::new();
    charstring.draw(&mut pen).unwrap();
    assert_eq!(
        pen[1..3],
        [
            PenCommand::CurveTo {
                cx0: 10.0,
                cy0: 0.0,
                cx1: 30.0,
                cy1: 30.0,
                x: 30.0,
                y: 70.0
            },
            // vertical start, the fifth operand moves the end point in y
            PenCommand::CurveTo {
                cx0: 30.0,
                cy0: 120.0,
                cx1: 90.0,
                cy1: 190.0,
                x: 170.0,
                y: 195.0
            },
        ]
    );
}

#[test]
fn vhcurveto_groups() {
    let data = program(&[
        &n(0),
        &n(0),
        RMOVETO,
        &n(10),
        &n(20),
        &n(30),
        &n(40),
        &n(50),
        &n(60),
        &n(70),
        &n(80),
        VHCURVETO,
        ENDCHAR,
    ]);
    let mut pen: Vec<PenCommand> = Vec::new();
    decode_simple(&data).unwrap().draw(&mut pen).unwrap();
    assert_eq!(
        pen[1..3],
        [
            PenCommand::CurveTo {
                cx0: 0.0,
                cy0: 10.0,
                cx1: 20.0,
                cy1: 40.0,
                x: 60.0,
                y: 40.0
            },
            PenCommand::CurveTo {
                cx0: 110.0,
                cy0: 40.0,
                cx1: 170.0,
                cy1: 110.0,
                x: 170.0,
                y: 190.0
            },
        ]
    );
}

#[test]
fn dotsection_is_materialized() {
    let data = program(&[
        &n(0),
        HMOVETO,
        &n(5),
        DOTSECTION,
        &n(10),
        HLINETO,
        ENDCHAR,
    ]);
    let charstring = decode_simple(&data).unwrap();
    assert_eq!(
        charstring.commands(),
        &[
            command(Operator::HMoveTo, &[0]),
            command(Operator::DotSection, &[]),
            command(Operator::HLineTo, &[10]),
            command(Operator::EndChar, &[]),
        ]
    );
    let mut pen: Vec<PenCommand> = Vec::new();
    charstring.draw(&mut pen).unwrap();
    assert_eq!(
        pen,
        [
            PenCommand::MoveTo { x: 0.0, y: 0.0 },
            PenCommand::LineTo { x: 10.0, y: 0.0 },
            PenCommand::Close,
        ]
    );
}

#[test]
fn hflex_returns_to_baseline() {
    let data = program(&[
        &n(0),
        &n(100),
        RMOVETO,
        &n(10),
        &n(10),
        &n(20),
        &n(10),
        &n(10),
        &n(10),
        &n(10),
        HFLEX,
        ENDCHAR,
    ]);
    let mut pen: Vec<PenCommand> = Vec::new();
    decode_simple(&data).unwrap().draw(&mut pen).unwrap();
    assert_eq!(
        &pen[1..3],
        &[
            PenCommand::CurveTo {
                cx0: 10.0,
                cy0: 100.0,
                cx1: 20.0,
                cy1: 120.0,
                x: 30.0,
                y: 120.0
            },
            PenCommand::CurveTo {
                cx0: 40.0,
                cy0: 120.0,
                cx1: 50.0,
                cy1: 100.0,
                x: 60.0,
                y: 100.0
            },
        ]
    );
}

#[test]
fn display_command() {
    let mut hintmask = command(Operator::HintMask, &[1, 2]);
    hintmask.mask = vec![0x80];
    assert_eq!(hintmask.to_string(), "1 2 hintmask 10000000");
    assert_eq!(Operator::RrCurveTo.to_string(), "rrcurveto");
}
