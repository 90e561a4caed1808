use crate::oer::*;
use rusticata_macros::debug::HexSlice;
use std::fmt;
use std::str;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrettyPrinterFlag {
    /// Print the width of integers
    ShowWidth,
    /// Print the raw content of decoded open types
    ShowRaw,
}

/// Pretty-print an OER value tree, one node per line
///
/// ```rust
/// # use oer_parser::oer::*;
/// let mut seq = OerSequence::new();
/// seq.push("id", OerValue::from_u64(32, 1));
/// seq.push("data", OerValue::OctetString(b"\x01\x02"));
/// let v = OerValue::Sequence(seq);
/// let s = format!("{:?}", v.as_pretty(0, 2));
/// assert!(s.contains("id: Integer(32)"));
/// ```
pub struct PrettyOer<'a> {
    obj: &'a OerValue<'a>,
    indent: usize,
    inc: usize,

    flags: Vec<PrettyPrinterFlag>,
}

impl<'a> OerValue<'a> {
    pub fn as_pretty(&'a self, indent: usize, increment: usize) -> PrettyOer<'a> {
        PrettyOer {
            obj: self,
            indent,
            inc: increment,

            flags: Vec::new(),
        }
    }
}

impl<'a> PrettyOer<'a> {
    pub fn set_flag(&mut self, flag: PrettyPrinterFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    pub fn next_indent<'b>(&self, obj: &'b OerValue) -> PrettyOer<'b> {
        PrettyOer {
            obj,
            indent: self.indent + self.inc,
            inc: self.inc,
            flags: self.flags.to_vec(),
        }
    }

    fn write_child(&self, f: &mut fmt::Formatter, label: &str, obj: &OerValue) -> fmt::Result {
        let child = self.next_indent(obj);
        if child.indent > 0 {
            write!(f, "{:1$}", " ", child.indent)?;
        }
        write!(f, "{}: ", label)?;
        // the child prints its own indentation otherwise
        child.write_node(f)
    }

    fn write_close(&self, f: &mut fmt::Formatter, c: char) -> fmt::Result {
        if self.indent > 0 {
            write!(f, "{:1$}", " ", self.indent)?;
        }
        writeln!(f, "{}", c)
    }

    fn write_node(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn print_string_with_type(f: &mut fmt::Formatter, s: &[u8], ty: StringType) -> fmt::Result {
            match str::from_utf8(s) {
                Ok(b) if ty.is_utf8_compatible() => writeln!(f, "{:?}(\"{}\")", ty, b),
                _ => writeln!(f, "{:?}({:?})", ty, HexSlice(s)),
            }
        }
        match self.obj {
            OerValue::Boolean(b) => writeln!(f, "Boolean({:?})", b),
            OerValue::Integer(i) => {
                if self.flags.contains(&PrettyPrinterFlag::ShowWidth) {
                    writeln!(f, "Integer({}, width={})", i, i.width())
                } else {
                    writeln!(f, "Integer({})", i)
                }
            }
            OerValue::Enumerated(e) => writeln!(f, "Enumerated({})", e),
            OerValue::Null => writeln!(f, "Null"),
            OerValue::OctetString(v) => writeln!(f, "OctetString({:?})", HexSlice(v)),
            OerValue::BitString(b) => writeln!(
                f,
                "BitString({},{:?})",
                b.unused_bits,
                HexSlice(b.data.as_ref())
            ),
            OerValue::CharacterString(ty, s) => print_string_with_type(f, s, *ty),
            OerValue::ObjectIdentifier(oid) => writeln!(f, "OID({})", oid),
            OerValue::Sequence(seq) => {
                writeln!(f, "Sequence {{")?;
                for (key, v) in &seq.fields {
                    self.write_child(f, key, v)?;
                }
                self.write_close(f, '}')
            }
            OerValue::SequenceOf(v) => {
                writeln!(f, "SequenceOf[")?;
                for (idx, o) in v.iter().enumerate() {
                    self.write_child(f, &idx.to_string(), o)?;
                }
                self.write_close(f, ']')
            }
            OerValue::Choice(c) => {
                writeln!(f, "Choice {} {{", c.tag)?;
                self.write_child(f, c.name.unwrap_or("?"), &c.value)?;
                self.write_close(f, '}')
            }
            OerValue::OpenType(o) => match o.decoded {
                Some(ref v) => {
                    if self.flags.contains(&PrettyPrinterFlag::ShowRaw) {
                        writeln!(f, "OpenType({:?}) {{", HexSlice(o.data))?;
                    } else {
                        writeln!(f, "OpenType {{")?;
                    }
                    self.write_child(f, "decoded", v)?;
                    self.write_close(f, '}')
                }
                None => writeln!(f, "OpenType({:?})", HexSlice(o.data)),
            },
        }
    }
}

impl<'a> fmt::Debug for PrettyOer<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.indent > 0 {
            write!(f, "{:1$}", " ", self.indent)?;
        }
        self.write_node(f)
    }
}
