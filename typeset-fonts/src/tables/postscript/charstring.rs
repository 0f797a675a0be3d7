//! Decoding for Type 2 charstrings.
//!
//! A charstring is decoded into the sequence of operators it executes, with
//! the bodies of called subroutines inlined. Arithmetic and storage operators
//! are evaluated on the operand stack and do not appear in the output.
//!
//! See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf>

use types::{BoundingBox, Fixed, Pen};

use super::{dict::parse_int, Error, Index, Stack};
use crate::font_data::{Cursor, FontData};

/// Maximum nesting depth for subroutine calls.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const NESTING_DEPTH_LIMIT: usize = 10;

/// Size of the transient array used by `put` and `get`.
const TRANSIENT_ARRAY_LEN: usize = 32;

/// Type 2 charstring operator.
///
/// See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=30>
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    HStem,
    VStem,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RrCurveTo,
    CallSubr,
    Return,
    EndChar,
    HStemHm,
    HintMask,
    CntrMask,
    RMoveTo,
    HMoveTo,
    VStemHm,
    RCurveLine,
    RLineCurve,
    VvCurveTo,
    HhCurveTo,
    CallGsubr,
    VhCurveTo,
    HvCurveTo,
    DotSection,
    And,
    Or,
    Not,
    Abs,
    Add,
    Sub,
    Div,
    Neg,
    Eq,
    Drop,
    Put,
    Get,
    IfElse,
    Mul,
    Sqrt,
    Dup,
    Exch,
    Index,
    Roll,
    HFlex,
    Flex,
    HFlex1,
    Flex1,
}

impl Operator {
    fn read(cursor: &mut Cursor, b0: u8) -> Result<Self, Error> {
        // Escape opcode for accessing two byte operators
        const ESCAPE: u8 = 12;
        if b0 == ESCAPE {
            let b1 = cursor.read::<u8>()?;
            Self::from_two_byte_opcode(b1).ok_or(Error::InvalidEscapedOperator(b1))
        } else {
            Self::from_opcode(b0).ok_or(Error::InvalidOperator(b0))
        }
    }

    /// Creates an operator from the given opcode.
    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            1 => HStem,
            3 => VStem,
            4 => VMoveTo,
            5 => RLineTo,
            6 => HLineTo,
            7 => VLineTo,
            8 => RrCurveTo,
            10 => CallSubr,
            11 => Return,
            14 => EndChar,
            18 => HStemHm,
            19 => HintMask,
            20 => CntrMask,
            21 => RMoveTo,
            22 => HMoveTo,
            23 => VStemHm,
            24 => RCurveLine,
            25 => RLineCurve,
            26 => VvCurveTo,
            27 => HhCurveTo,
            29 => CallGsubr,
            30 => VhCurveTo,
            31 => HvCurveTo,
            _ => return None,
        })
    }

    /// Creates an operator from the given extended opcode.
    ///
    /// These are preceded by a byte containing the escape value of 12.
    /// `random` (12 23) is not supported.
    fn from_two_byte_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            0 => DotSection,
            3 => And,
            4 => Or,
            5 => Not,
            9 => Abs,
            10 => Add,
            11 => Sub,
            12 => Div,
            14 => Neg,
            15 => Self::Eq,
            18 => Drop,
            20 => Put,
            21 => Get,
            22 => IfElse,
            24 => Mul,
            26 => Sqrt,
            27 => Dup,
            28 => Exch,
            29 => Self::Index,
            30 => Roll,
            34 => HFlex,
            35 => Flex,
            36 => HFlex1,
            37 => Flex1,
            _ => return None,
        })
    }

    /// The operator's name, as written in the Type 2 charstring format.
    pub fn name(self) -> &'static str {
        use Operator::*;
        match self {
            HStem => "hstem",
            VStem => "vstem",
            VMoveTo => "vmoveto",
            RLineTo => "rlineto",
            HLineTo => "hlineto",
            VLineTo => "vlineto",
            RrCurveTo => "rrcurveto",
            CallSubr => "callsubr",
            Return => "return",
            EndChar => "endchar",
            HStemHm => "hstemhm",
            HintMask => "hintmask",
            CntrMask => "cntrmask",
            RMoveTo => "rmoveto",
            HMoveTo => "hmoveto",
            VStemHm => "vstemhm",
            RCurveLine => "rcurveline",
            RLineCurve => "rlinecurve",
            VvCurveTo => "vvcurveto",
            HhCurveTo => "hhcurveto",
            CallGsubr => "callgsubr",
            VhCurveTo => "vhcurveto",
            HvCurveTo => "hvcurveto",
            DotSection => "dotsection",
            And => "and",
            Or => "or",
            Not => "not",
            Abs => "abs",
            Add => "add",
            Sub => "sub",
            Div => "div",
            Neg => "neg",
            Self::Eq => "eq",
            Drop => "drop",
            Put => "put",
            Get => "get",
            IfElse => "ifelse",
            Mul => "mul",
            Sqrt => "sqrt",
            Dup => "dup",
            Exch => "exch",
            Self::Index => "index",
            Roll => "roll",
            HFlex => "hflex",
            Flex => "flex",
            HFlex1 => "hflex1",
            Flex1 => "flex1",
        }
    }

    /// Operators that may be preceded by the advance width if they are the
    /// first stack-clearing operator in a charstring.
    fn may_carry_width(self) -> bool {
        use Operator::*;
        matches!(
            self,
            HStem
                | VStem
                | HStemHm
                | VStemHm
                | HintMask
                | CntrMask
                | RMoveTo
                | HMoveTo
                | VMoveTo
                | EndChar
        )
    }

    /// Returns true if `count` operands are acceptable for this operator.
    fn accepts(self, count: usize) -> bool {
        use Operator::*;
        match self {
            HStem | VStem | HStemHm | VStemHm => count >= 2 && count % 2 == 0,
            HintMask | CntrMask => count % 2 == 0,
            RMoveTo => count == 2,
            HMoveTo | VMoveTo => count == 1,
            RLineTo => count >= 2 && count % 2 == 0,
            HLineTo | VLineTo => count >= 1,
            RrCurveTo => count >= 6 && count % 6 == 0,
            HhCurveTo | VvCurveTo | HvCurveTo | VhCurveTo => count >= 4 && count % 4 <= 1,
            RCurveLine => count >= 8 && (count - 2) % 6 == 0,
            RLineCurve => count >= 8 && count % 2 == 0,
            Flex => count == 13,
            HFlex => count == 7,
            HFlex1 => count == 9,
            Flex1 => count == 11,
            EndChar => count == 0 || count == 4,
            _ => true,
        }
    }

    /// The number of operands that signals a leading width for operators
    /// with a fixed arity.
    fn is_width_count(self, count: usize) -> bool {
        use Operator::*;
        match self {
            RMoveTo => count == 3,
            HMoveTo | VMoveTo => count == 2,
            EndChar => count == 1 || count == 5,
            _ => count % 2 == 1,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single materialized charstring operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub operator: Operator,
    pub operands: Vec<Fixed>,
    /// Mask bytes following a `hintmask` or `cntrmask` operator.
    pub mask: Vec<u8>,
}

impl Command {
    pub fn new(operator: Operator, operands: impl IntoIterator<Item = Fixed>) -> Self {
        Self {
            operator,
            operands: operands.into_iter().collect(),
            mask: Vec::new(),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for operand in &self.operands {
            write!(f, "{operand} ")?;
        }
        f.write_str(self.operator.name())?;
        for byte in &self.mask {
            write!(f, " {byte:08b}")?;
        }
        Ok(())
    }
}

/// The decoded form of a charstring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharString {
    commands: Vec<Command>,
    width: Option<Fixed>,
}

impl CharString {
    /// The operators executed by the charstring, with subroutine calls
    /// inlined.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The width operand, if the charstring supplied one.
    ///
    /// This is a delta from the Private DICT's `nominalWidthX`.
    pub fn width(&self) -> Option<Fixed> {
        self.width
    }

    /// Resolves the advance width given the values from the Private DICT.
    pub fn advance_width(&self, default_width_x: Fixed, nominal_width_x: Fixed) -> Fixed {
        match self.width {
            Some(width) => nominal_width_x + width,
            None => default_width_x,
        }
    }

    /// Emits the outline to `pen` in absolute coordinates.
    ///
    /// Hint operators are skipped and each subpath is closed.
    pub fn draw(&self, pen: &mut impl Pen) -> Result<(), Error> {
        let mut outline = Outline {
            pen,
            x: Fixed::ZERO,
            y: Fixed::ZERO,
            is_open: false,
        };
        for command in &self.commands {
            outline.command(command)?;
        }
        outline.finish();
        Ok(())
    }

    /// The bounding box of every on and off curve point of the outline, or
    /// `None` for an empty glyph.
    pub fn bounds(&self) -> Result<Option<BoundingBox<f32>>, Error> {
        let mut pen = ControlBounds(None);
        self.draw(&mut pen)?;
        Ok(pen.0)
    }
}

/// Decodes `charstring_data`.
///
/// If the font (or the Font DICT selected for this glyph) has local
/// subroutines they must be provided, otherwise a `callsubr` produces
/// [`Error::MissingSubroutines`].
pub fn decode<'a>(
    charstring_data: &'a [u8],
    global_subrs: Index<'a>,
    local_subrs: Option<Index<'a>>,
) -> Result<CharString, Error> {
    let mut decoder = Decoder::new(global_subrs, local_subrs);
    decoder.run(charstring_data)?;
    Ok(CharString {
        commands: decoder.commands,
        width: decoder.width,
    })
}

/// Transient state for decoding a charstring.
struct Decoder<'a> {
    global_subrs: Index<'a>,
    local_subrs: Option<Index<'a>>,
    stack: Stack,
    transient: [Fixed; TRANSIENT_ARRAY_LEN],
    stem_count: usize,
    have_read_width: bool,
    width: Option<Fixed>,
    commands: Vec<Command>,
}

impl<'a> Decoder<'a> {
    fn new(global_subrs: Index<'a>, local_subrs: Option<Index<'a>>) -> Self {
        Self {
            global_subrs,
            local_subrs,
            stack: Stack::new(),
            transient: [Fixed::ZERO; TRANSIENT_ARRAY_LEN],
            stem_count: 0,
            have_read_width: false,
            width: None,
            commands: Vec::new(),
        }
    }

    /// Runs the program until `endchar`, a top level `return` or the end of
    /// the data.
    ///
    /// Subroutine calls push the caller's cursor onto an explicit stack of
    /// return addresses, bounded by [`NESTING_DEPTH_LIMIT`].
    fn run(&mut self, charstring_data: &'a [u8]) -> Result<(), Error> {
        let mut callers: Vec<Cursor<'a>> = Vec::with_capacity(NESTING_DEPTH_LIMIT);
        let mut cursor = FontData::new(charstring_data).cursor();
        loop {
            if cursor.remaining_bytes() == 0 {
                // a subroutine without a trailing return resumes its caller
                match callers.pop() {
                    Some(caller) => {
                        cursor = caller;
                        continue;
                    }
                    None => return Ok(()),
                }
            }
            let b0 = cursor.read::<u8>()?;
            let operator = match b0 {
                // See "3.2 Charstring Number Encoding" <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=12>
                28 | 32..=254 => {
                    self.stack.push(parse_int(&mut cursor, b0)?)?;
                    continue;
                }
                255 => {
                    self.stack.push(Fixed::from_bits(cursor.read::<i32>()?))?;
                    continue;
                }
                _ => Operator::read(&mut cursor, b0)?,
            };
            match operator {
                Operator::CallSubr | Operator::CallGsubr => {
                    if callers.len() == NESTING_DEPTH_LIMIT {
                        return Err(Error::NestingDepthExceeded);
                    }
                    let subr_data = self.subroutine(operator)?;
                    callers.push(cursor);
                    cursor = FontData::new(subr_data).cursor();
                }
                Operator::Return => match callers.pop() {
                    Some(caller) => cursor = caller,
                    None => {
                        self.emit(operator)?;
                        return Ok(());
                    }
                },
                Operator::EndChar => {
                    self.emit(operator)?;
                    return Ok(());
                }
                Operator::DotSection => {
                    // takes no operands; anything left on the stack is dropped
                    self.commands.push(Command::new(operator, []));
                    self.stack.clear();
                }
                Operator::HintMask | Operator::CntrMask => {
                    self.emit(operator)?;
                    let mask_len = self.stem_count.div_ceil(8);
                    let mask = cursor.read_array::<u8>(mask_len)?;
                    if let Some(command) = self.commands.last_mut() {
                        command.mask = mask.to_vec();
                    }
                }
                _ if self.evaluate_arithmetic(operator)? => {}
                _ => self.emit(operator)?,
            }
        }
    }

    /// Pops the subroutine number from the stack and returns the body of
    /// the subroutine it names.
    fn subroutine(&mut self, operator: Operator) -> Result<&'a [u8], Error> {
        let subrs = if operator == Operator::CallSubr {
            self.local_subrs.ok_or(Error::MissingSubroutines)?
        } else {
            self.global_subrs
        };
        let index = self.stack.pop_i32()?.saturating_add(subrs.subr_bias());
        if index < 0 || index as u32 >= subrs.count() {
            return Err(Error::InvalidSubroutineIndex(index));
        }
        log::trace!("{} {index}", operator.name());
        subrs.get(index as usize)
    }

    /// Validates the operand count, separates the width and materializes
    /// the operator.
    fn emit(&mut self, operator: Operator) -> Result<(), Error> {
        let mut first = 0;
        if operator.may_carry_width() && !self.have_read_width {
            self.have_read_width = true;
            if operator.is_width_count(self.stack.len()) {
                self.width = Some(self.stack.get_fixed(0)?);
                first = 1;
            }
        }
        let count = self.stack.len() - first;
        if !operator.accepts(count) {
            return Err(Error::InvalidArgumentCount { operator, count });
        }
        if matches!(
            operator,
            Operator::HStem
                | Operator::VStem
                | Operator::HStemHm
                | Operator::VStemHm
                | Operator::HintMask
                | Operator::CntrMask
        ) {
            self.stem_count += count / 2;
        }
        let operands = self.stack.fixed_values().skip(first);
        self.commands.push(Command::new(operator, operands));
        self.stack.clear();
        Ok(())
    }

    /// Evaluates the arithmetic, logical and storage operators.
    ///
    /// Returns `Ok(false)` if `operator` is not one of them.
    fn evaluate_arithmetic(&mut self, operator: Operator) -> Result<bool, Error> {
        use Operator::*;
        let stack = &mut self.stack;
        let truth = |value: bool| if value { Fixed::ONE } else { Fixed::ZERO };
        match operator {
            Abs => {
                let a = stack.pop_fixed()?;
                stack.push(a.abs())?;
            }
            Neg => {
                let a = stack.pop_fixed()?;
                stack.push(-a)?;
            }
            Sqrt => {
                let a = stack.pop_fixed()?;
                stack.push(a.sqrt())?;
            }
            Not => {
                let a = stack.pop_fixed()?;
                stack.push(truth(a == Fixed::ZERO))?;
            }
            Add | Sub | Mul | Div | And | Or | Operator::Eq => {
                let b = stack.pop_fixed()?;
                let a = stack.pop_fixed()?;
                let result = match operator {
                    Add => a + b,
                    Sub => a - b,
                    Mul => a * b,
                    Div => a / b,
                    And => truth(a != Fixed::ZERO && b != Fixed::ZERO),
                    Or => truth(a != Fixed::ZERO || b != Fixed::ZERO),
                    _ => truth(a == b),
                };
                stack.push(result)?;
            }
            Drop => {
                stack.pop_fixed()?;
            }
            Dup => stack.index(0)?,
            Exch => stack.exch()?,
            Operator::Index => {
                let depth = stack.pop_i32()?;
                stack.index(depth)?;
            }
            Roll => {
                let shift = stack.pop_i32()?;
                let count = stack.pop_i32()?;
                stack.roll(count, shift)?;
            }
            IfElse => {
                let v2 = stack.pop_fixed()?;
                let v1 = stack.pop_fixed()?;
                let s2 = stack.pop_fixed()?;
                let s1 = stack.pop_fixed()?;
                stack.push(if v1 <= v2 { s1 } else { s2 })?;
            }
            Put => {
                let index = stack.pop_i32()?;
                let value = stack.pop_fixed()?;
                let slot = usize::try_from(index)
                    .ok()
                    .and_then(|index| self.transient.get_mut(index))
                    .ok_or(Error::InvalidStackAccess(index.max(0) as usize))?;
                *slot = value;
            }
            Get => {
                let index = stack.pop_i32()?;
                let value = usize::try_from(index)
                    .ok()
                    .and_then(|index| self.transient.get(index))
                    .copied()
                    .ok_or(Error::InvalidStackAccess(index.max(0) as usize))?;
                stack.push(value)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Converts decoded commands into absolute outline segments.
struct Outline<'p, P> {
    pen: &'p mut P,
    x: Fixed,
    y: Fixed,
    is_open: bool,
}

impl<P: Pen> Outline<'_, P> {
    fn command(&mut self, command: &Command) -> Result<(), Error> {
        use Operator::*;
        let args = command.operands.as_slice();
        let count = args.len();
        match command.operator {
            RMoveTo => {
                let [dx, dy] = fixed_array(args, 0)?;
                self.move_to(self.x + dx, self.y + dy);
            }
            HMoveTo => {
                let [dx] = fixed_array(args, 0)?;
                self.move_to(self.x + dx, self.y);
            }
            VMoveTo => {
                let [dy] = fixed_array(args, 0)?;
                self.move_to(self.x, self.y + dy);
            }
            RLineTo => {
                for pair in args.chunks_exact(2) {
                    self.x += pair[0];
                    self.y += pair[1];
                    self.line_to();
                }
            }
            HLineTo | VLineTo => {
                let mut is_x = command.operator == HLineTo;
                for value in args {
                    if is_x {
                        self.x += *value;
                    } else {
                        self.y += *value;
                    }
                    is_x = !is_x;
                    self.line_to();
                }
            }
            RrCurveTo | RCurveLine => {
                let mut i = 0;
                while i + 6 <= count {
                    let [dxa, dya, dxb, dyb, dxc, dyc] = fixed_array(args, i)?;
                    let (x1, y1) = (self.x + dxa, self.y + dya);
                    let (x2, y2) = (x1 + dxb, y1 + dyb);
                    self.curve_to(x1, y1, x2, y2, x2 + dxc, y2 + dyc);
                    i += 6;
                }
                if command.operator == RCurveLine {
                    let [dx, dy] = fixed_array(args, i)?;
                    self.x += dx;
                    self.y += dy;
                    self.line_to();
                }
            }
            RLineCurve => {
                let mut i = 0;
                while i + 6 < count {
                    let [dx, dy] = fixed_array(args, i)?;
                    self.x += dx;
                    self.y += dy;
                    self.line_to();
                    i += 2;
                }
                let [dxa, dya, dxb, dyb, dxc, dyc] = fixed_array(args, i)?;
                let (x1, y1) = (self.x + dxa, self.y + dya);
                let (x2, y2) = (x1 + dxb, y1 + dyb);
                self.curve_to(x1, y1, x2, y2, x2 + dxc, y2 + dyc);
            }
            // Curves that start and end horizontal, unless the count is odd,
            // in which case the first curve may start with a vertical tangent
            HhCurveTo => {
                let mut i = 0;
                let mut dy1 = Fixed::ZERO;
                if count % 2 == 1 {
                    [dy1] = fixed_array(args, 0)?;
                    i = 1;
                }
                while i + 4 <= count {
                    let [dxa, dxb, dyb, dxc] = fixed_array(args, i)?;
                    let (x1, y1) = (self.x + dxa, self.y + dy1);
                    let (x2, y2) = (x1 + dxb, y1 + dyb);
                    self.curve_to(x1, y1, x2, y2, x2 + dxc, y2);
                    dy1 = Fixed::ZERO;
                    i += 4;
                }
            }
            VvCurveTo => {
                let mut i = 0;
                let mut dx1 = Fixed::ZERO;
                if count % 2 == 1 {
                    [dx1] = fixed_array(args, 0)?;
                    i = 1;
                }
                while i + 4 <= count {
                    let [dya, dxb, dyb, dyc] = fixed_array(args, i)?;
                    let (x1, y1) = (self.x + dx1, self.y + dya);
                    let (x2, y2) = (x1 + dxb, y1 + dyb);
                    self.curve_to(x1, y1, x2, y2, x2, y2 + dyc);
                    dx1 = Fixed::ZERO;
                    i += 4;
                }
            }
            // Alternates between curves with horizontal and vertical tangents
            HvCurveTo | VhCurveTo => {
                let mut i = 0;
                let mut horizontal = command.operator == HvCurveTo;
                while i + 4 <= count {
                    let [a, b, c, d] = fixed_array(args, i)?;
                    // the final curve may carry a fifth operand
                    let last = if count - i == 5 { args[i + 4] } else { Fixed::ZERO };
                    if horizontal {
                        let (x1, y1) = (self.x + a, self.y);
                        let (x2, y2) = (x1 + b, y1 + c);
                        self.curve_to(x1, y1, x2, y2, x2 + last, y2 + d);
                    } else {
                        let (x1, y1) = (self.x, self.y + a);
                        let (x2, y2) = (x1 + b, y1 + c);
                        self.curve_to(x1, y1, x2, y2, x2 + d, y2 + last);
                    }
                    horizontal = !horizontal;
                    i += 4;
                }
            }
            // The flex operators emit two curves. The flex depth operand
            // (which could turn them into a line) is ignored.
            Flex => {
                let args: [Fixed; 12] = fixed_array(args, 0)?;
                self.flex_curves(args, None);
            }
            HFlex => {
                let [dx1, dx2, dy2, dx3, dx4, dx5, dx6] = fixed_array(args, 0)?;
                let z = Fixed::ZERO;
                let args = [dx1, z, dx2, dy2, dx3, z, dx4, z, dx5, -dy2, dx6, z];
                self.flex_curves(args, None);
            }
            HFlex1 => {
                let [dx1, dy1, dx2, dy2, dx3, dx4, dx5, dy5, dx6] = fixed_array(args, 0)?;
                let z = Fixed::ZERO;
                let dy6 = -(dy1 + dy2 + dy5);
                let args = [dx1, dy1, dx2, dy2, dx3, z, dx4, z, dx5, dy5, dx6, dy6];
                self.flex_curves(args, None);
            }
            Flex1 => {
                let mut deltas = [Fixed::ZERO; 12];
                let head: [Fixed; 10] = fixed_array(args, 0)?;
                deltas[..10].copy_from_slice(&head);
                let [d6] = fixed_array(args, 10)?;
                self.flex_curves(deltas, Some(d6));
            }
            EndChar => self.finish(),
            _ => {}
        }
        Ok(())
    }

    /// Emits the two curves of a flex given twelve relative coordinates.
    ///
    /// For `flex1`, the last point is given by a single delta applied in
    /// the dominant direction of travel.
    fn flex_curves(&mut self, d: [Fixed; 12], flex1_last: Option<Fixed>) {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (x0 + d[0], y0 + d[1]);
        let (x2, y2) = (x1 + d[2], y1 + d[3]);
        let (x3, y3) = (x2 + d[4], y2 + d[5]);
        self.curve_to(x1, y1, x2, y2, x3, y3);
        let (x4, y4) = (x3 + d[6], y3 + d[7]);
        let (x5, y5) = (x4 + d[8], y4 + d[9]);
        let (x6, y6) = match flex1_last {
            Some(last) if (x5 - x0).abs() > (y5 - y0).abs() => (x5 + last, y0),
            Some(last) => (x0, y5 + last),
            None => (x5 + d[10], y5 + d[11]),
        };
        self.curve_to(x4, y4, x5, y5, x6, y6);
    }

    fn move_to(&mut self, x: Fixed, y: Fixed) {
        if self.is_open {
            self.pen.close();
        }
        self.is_open = true;
        self.x = x;
        self.y = y;
        self.pen.move_to(x.to_f32(), y.to_f32());
    }

    fn line_to(&mut self) {
        self.pen.line_to(self.x.to_f32(), self.y.to_f32());
    }

    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
        self.x = x;
        self.y = y;
        self.pen.curve_to(
            cx0.to_f32(),
            cy0.to_f32(),
            cx1.to_f32(),
            cy1.to_f32(),
            x.to_f32(),
            y.to_f32(),
        );
    }

    fn finish(&mut self) {
        if self.is_open {
            self.is_open = false;
            self.pen.close();
        }
    }
}

fn fixed_array<const N: usize>(args: &[Fixed], first: usize) -> Result<[Fixed; N], Error> {
    args.get(first..first + N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(Error::InvalidStackAccess(first + N - 1))
}

/// A pen that tracks the extents of every point it is given.
struct ControlBounds(Option<BoundingBox<f32>>);

impl ControlBounds {
    fn add(&mut self, x: f32, y: f32) {
        match self.0.as_mut() {
            Some(bounds) => bounds.add_point(x, y),
            None => self.0 = Some(BoundingBox::from_point(x, y)),
        }
    }
}

impl Pen for ControlBounds {
    fn move_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(cx1, cy1);
        self.add(x, y);
    }

    fn close(&mut self) {}
}

#[cfg(test)]
#[path = "../../tests/test_charstring.rs"]
mod tests;
