use crate::error::OerError;
use crate::oer::Class;
use crate::oid::Oid;
use num_traits::ToPrimitive;
use rusticata_macros::newtype_enum;
use std::borrow::Cow;
use std::convert::TryFrom;
use std::fmt;
use std::ops::Index;
use std::str;

/// Restricted character string type
///
/// Values are the ASN.1 universal tag numbers of the string types.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringType(pub u8);

newtype_enum! {
impl debug StringType {
    Utf8String = 0x0c,
    NumericString = 0x12,
    PrintableString = 0x13,
    Ia5String = 0x16,
    VisibleString = 0x1a,
    UniversalString = 0x1c,
    BmpString = 0x1e,
}
}

impl StringType {
    /// Number of octets per character, for known-multiplier character strings
    ///
    /// Returns `None` for UTF8String, which is always length-prefixed.
    pub fn octets_per_char(self) -> Option<usize> {
        match self {
            StringType::BmpString => Some(2),
            StringType::UniversalString => Some(4),
            StringType::Utf8String => None,
            _ => Some(1),
        }
    }

    /// Test if the content octets can be read as a Rust string
    pub fn is_utf8_compatible(self) -> bool {
        matches!(
            self,
            StringType::Utf8String
                | StringType::NumericString
                | StringType::PrintableString
                | StringType::Ia5String
                | StringType::VisibleString
        )
    }
}

/// Tag of a CHOICE alternative
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OerTag {
    pub class: Class,
    pub number: u64,
}

impl OerTag {
    pub const fn new(class: Class, number: u64) -> Self {
        OerTag { class, number }
    }

    /// Context-specific tag, the usual case with AUTOMATIC TAGS
    pub const fn context(number: u64) -> Self {
        OerTag {
            class: Class::ContextSpecific,
            number,
        }
    }
}

impl fmt::Display for OerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            Class::ContextSpecific => write!(f, "[{}]", self.number),
            class => write!(f, "[{} {}]", class, self.number),
        }
    }
}

/// Decoded integer, tagged with the number of octets it was read from
#[derive(Clone, Debug, PartialEq)]
pub enum OerInteger {
    Unsigned { value: u64, width: u8 },
    Signed { value: i64, width: u8 },
    /// Unbounded integer wider than 4 octets
    #[cfg(feature = "bigint")]
    Big(num_bigint::BigInt),
}

impl OerInteger {
    /// Number of content octets on the wire
    pub fn width(&self) -> usize {
        match self {
            OerInteger::Unsigned { width, .. } | OerInteger::Signed { width, .. } => {
                *width as usize
            }
            #[cfg(feature = "bigint")]
            OerInteger::Big(b) => b.to_signed_bytes_be().len(),
        }
    }
}

impl ToPrimitive for OerInteger {
    fn to_i64(&self) -> Option<i64> {
        match self {
            OerInteger::Unsigned { value, .. } => i64::try_from(*value).ok(),
            OerInteger::Signed { value, .. } => Some(*value),
            #[cfg(feature = "bigint")]
            OerInteger::Big(b) => b.to_i64(),
        }
    }

    fn to_u64(&self) -> Option<u64> {
        match self {
            OerInteger::Unsigned { value, .. } => Some(*value),
            OerInteger::Signed { value, .. } => u64::try_from(*value).ok(),
            #[cfg(feature = "bigint")]
            OerInteger::Big(b) => b.to_u64(),
        }
    }
}

impl fmt::Display for OerInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OerInteger::Unsigned { value, .. } => write!(f, "{}", value),
            OerInteger::Signed { value, .. } => write!(f, "{}", value),
            #[cfg(feature = "bigint")]
            OerInteger::Big(b) => write!(f, "{}", b),
        }
    }
}

/// BitString wrapper
///
/// Padding bits of the last octet are always zero. The data is borrowed from the input
/// unless padding had to be cleared.
#[derive(Clone, Debug, PartialEq)]
pub struct BitStringObject<'a> {
    pub unused_bits: u8,
    pub data: Cow<'a, [u8]>,
}

impl<'a> BitStringObject<'a> {
    /// Build a bit string, clearing the `unused_bits` low-order bits of the last octet
    pub fn new(unused_bits: u8, data: &'a [u8]) -> Self {
        let mask = (0xffu16 << unused_bits) as u8;
        match data.last() {
            Some(&last) if last & !mask != 0 => {
                let mut owned = data.to_vec();
                if let Some(b) = owned.last_mut() {
                    *b &= mask;
                }
                BitStringObject {
                    unused_bits,
                    data: Cow::Owned(owned),
                }
            }
            _ => BitStringObject {
                unused_bits,
                data: Cow::Borrowed(data),
            },
        }
    }

    /// Number of significant bits
    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    /// Test if bit `bitnum` is set
    pub fn is_set(&self, bitnum: usize) -> bool {
        if bitnum >= self.bit_len() {
            return false;
        }
        let b = 7 - (bitnum % 8);
        (self.data[bitnum / 8] & (1 << b)) != 0
    }
}

impl<'a> AsRef<[u8]> for BitStringObject<'a> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Decoded SEQUENCE: fields in declaration order, absent optional fields omitted
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OerSequence<'a> {
    pub fields: Vec<(&'static str, OerValue<'a>)>,
}

impl<'a> OerSequence<'a> {
    pub fn new() -> Self {
        OerSequence { fields: Vec::new() }
    }

    pub fn push(&mut self, key: &'static str, value: OerValue<'a>) {
        self.fields.push((key, value));
    }

    /// Get the value of a field by key
    pub fn get(&self, key: &str) -> Option<&OerValue<'a>> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a, 'k> Index<&'k str> for OerSequence<'a> {
    type Output = OerValue<'a>;

    fn index(&self, key: &'k str) -> &OerValue<'a> {
        match self.get(key) {
            Some(v) => v,
            None => panic!("No field named {} in sequence", key),
        }
    }
}

/// Decoded CHOICE: selected tag and inner value
#[derive(Clone, Debug, PartialEq)]
pub struct OerChoice<'a> {
    pub tag: OerTag,
    /// Key of the matched alternative, `None` if the tag is not known by the schema
    pub name: Option<&'static str>,
    pub value: Box<OerValue<'a>>,
}

/// Open type: raw content octets, optionally decoded further
#[derive(Clone, Debug, PartialEq)]
pub struct OerOpenType<'a> {
    pub data: &'a [u8],
    pub decoded: Option<Box<OerValue<'a>>>,
}

impl<'a> OerOpenType<'a> {
    pub fn raw(data: &'a [u8]) -> Self {
        OerOpenType {
            data,
            decoded: None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }
}

/// Decoded OER value
#[derive(Clone, Debug, PartialEq)]
pub enum OerValue<'a> {
    Boolean(bool),
    Integer(OerInteger),
    Enumerated(i64),
    Null,
    OctetString(&'a [u8]),
    BitString(BitStringObject<'a>),
    CharacterString(StringType, &'a [u8]),
    ObjectIdentifier(Oid),
    Sequence(OerSequence<'a>),
    SequenceOf(Vec<OerValue<'a>>),
    Choice(OerChoice<'a>),
    OpenType(OerOpenType<'a>),
}

impl<'a> OerValue<'a> {
    /// Build an unsigned integer value
    pub fn from_u64(value: u64, width: u8) -> Self {
        OerValue::Integer(OerInteger::Unsigned { value, width })
    }

    /// Build a signed integer value
    pub fn from_i64(value: i64, width: u8) -> Self {
        OerValue::Integer(OerInteger::Signed { value, width })
    }

    pub fn as_bool(&self) -> Result<bool, OerError> {
        match *self {
            OerValue::Boolean(b) => Ok(b),
            _ => Err(OerError::TypeError),
        }
    }

    /// Attempt to read an unsigned value from an integer or enumerated value.
    ///
    /// ```rust
    /// # use oer_parser::oer::OerValue;
    /// let v = OerValue::from_u64(0x10001, 4);
    /// assert_eq!(v.as_u64(), Ok(0x10001));
    /// ```
    pub fn as_u64(&self) -> Result<u64, OerError> {
        match self {
            OerValue::Integer(i) => i.to_u64().ok_or(OerError::IntegerTooLarge),
            OerValue::Enumerated(e) => u64::try_from(*e).or(Err(OerError::IntegerTooLarge)),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_u32(&self) -> Result<u32, OerError> {
        self.as_u64()
            .and_then(|x| u32::try_from(x).or(Err(OerError::IntegerTooLarge)))
    }

    pub fn as_i64(&self) -> Result<i64, OerError> {
        match self {
            OerValue::Integer(i) => i.to_i64().ok_or(OerError::IntegerTooLarge),
            OerValue::Enumerated(e) => Ok(*e),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_integer(&self) -> Result<&OerInteger, OerError> {
        match self {
            OerValue::Integer(i) => Ok(i),
            _ => Err(OerError::TypeError),
        }
    }

    /// Ordinal of an enumerated value. Not checked against the known enumerators.
    pub fn as_enumerated(&self) -> Result<i64, OerError> {
        match *self {
            OerValue::Enumerated(e) => Ok(e),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_bitstring(&self) -> Result<&BitStringObject<'a>, OerError> {
        match self {
            OerValue::BitString(b) => Ok(b),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_oid(&self) -> Result<&Oid, OerError> {
        match self {
            OerValue::ObjectIdentifier(o) => Ok(o),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_sequence(&self) -> Result<&OerSequence<'a>, OerError> {
        match self {
            OerValue::Sequence(s) => Ok(s),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_sequence_of(&self) -> Result<&Vec<OerValue<'a>>, OerError> {
        match self {
            OerValue::SequenceOf(v) => Ok(v),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_choice(&self) -> Result<&OerChoice<'a>, OerError> {
        match self {
            OerValue::Choice(c) => Ok(c),
            _ => Err(OerError::TypeError),
        }
    }

    pub fn as_open_type(&self) -> Result<&OerOpenType<'a>, OerError> {
        match self {
            OerValue::OpenType(o) => Ok(o),
            _ => Err(OerError::TypeError),
        }
    }

    /// Attempt to get the content octets of a string-like value, as a slice.
    ///
    /// Bit strings are excluded when their padding had to be cleared, since the slice
    /// would no longer refer to the input.
    #[rustfmt::skip]
    pub fn as_slice(&self) -> Result<&'a [u8], OerError> {
        match *self {
            OerValue::OctetString(s) |
            OerValue::CharacterString(_, s) => Ok(s),
            OerValue::OpenType(ref o) => Ok(o.data),
            OerValue::BitString(BitStringObject { data: Cow::Borrowed(s), .. }) => Ok(s),
            _ => Err(OerError::TypeError),
        }
    }

    /// Attempt to get the content of a character string as a `str`.
    ///
    /// Only UTF-8 compatible string types are considered.
    pub fn as_str(&self) -> Result<&'a str, OerError> {
        match *self {
            OerValue::CharacterString(t, s) if t.is_utf8_compatible() => {
                str::from_utf8(s).or(Err(OerError::TypeError))
            }
            _ => Err(OerError::TypeError),
        }
    }

    /// Follow choice and decoded open type wrappers down to the innermost value
    pub fn innermost(&self) -> &OerValue<'a> {
        match self {
            OerValue::Choice(c) => c.value.innermost(),
            OerValue::OpenType(OerOpenType {
                decoded: Some(v), ..
            }) => v.innermost(),
            v => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_u64() {
        assert_eq!(OerValue::from_u64(0x10002, 4).as_u64(), Ok(0x10002));
        assert_eq!(OerValue::from_i64(-1, 1).as_u64(), Err(OerError::IntegerTooLarge));
        assert_eq!(OerValue::from_i64(-1, 1).as_i64(), Ok(-1));
        assert_eq!(OerValue::Enumerated(3).as_u32(), Ok(3));
        assert_eq!(
            OerValue::from_u64(u64::MAX, 8).as_u32(),
            Err(OerError::IntegerTooLarge)
        );
        assert_eq!(OerValue::Null.as_u64(), Err(OerError::TypeError));
    }

    #[test]
    fn test_bitstring_mask() {
        let data = [0x0f, 0x00, 0x47];
        let obj = BitStringObject::new(3, &data);
        assert_eq!(obj.data.as_ref(), &[0x0f, 0x00, 0x40]);
        assert!(matches!(obj.data, Cow::Owned(_)));
        assert_eq!(obj.bit_len(), 21);
        assert!(!obj.is_set(0));
        assert!(obj.is_set(7));
        assert!(!obj.is_set(9));
        assert!(obj.is_set(17));
        assert!(!obj.is_set(23));

        let clean = BitStringObject::new(3, &data[..2]);
        assert!(matches!(clean.data, Cow::Borrowed(_)));
    }

    #[test]
    fn test_sequence_lookup() {
        let mut seq = OerSequence::new();
        seq.push("a", OerValue::Boolean(true));
        seq.push("c", OerValue::Null);
        assert!(seq.contains("a"));
        assert!(!seq.contains("b"));
        assert_eq!(seq["c"], OerValue::Null);
        assert_eq!(seq.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_string_types() {
        assert_eq!(StringType::BmpString.octets_per_char(), Some(2));
        assert_eq!(StringType::Utf8String.octets_per_char(), None);
        assert_eq!(format!("{:?}", StringType::Ia5String), "Ia5String");
        let v = OerValue::CharacterString(StringType::Ia5String, b"abc");
        assert_eq!(v.as_str(), Ok("abc"));
        let v = OerValue::CharacterString(StringType::BmpString, b"\x00a");
        assert_eq!(v.as_str(), Err(OerError::TypeError));
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(format!("{}", OerTag::context(3)), "[3]");
        assert_eq!(
            format!("{}", OerTag::new(Class::Application, 1)),
            "[APPLICATION 1]"
        );
    }
}
