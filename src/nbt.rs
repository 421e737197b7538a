// Tagged tree document codec.
//
// The network embeds structured metadata as NBT-style self-describing trees.
// Unlike the rest of the packet stream this format is little-endian with
// fixed-width lengths: names and strings carry a u16 byte length, lists and
// int-arrays a signed 32-bit count. That layout is a historical artifact and
// has to be reproduced exactly for the client to accept it.

use std::sync::OnceLock;

use bytes::Bytes;
use serde_json::Value as JsonValue;

use crate::binary_stream::{ByteReader, ByteWriter};
use crate::error::{ProtocolError, Result};

pub const TAG_END: u8 = 0;
pub const TAG_BYTE: u8 = 1;
pub const TAG_SHORT: u8 = 2;
pub const TAG_INT: u8 = 3;
pub const TAG_LONG: u8 = 4;
pub const TAG_FLOAT: u8 = 5;
pub const TAG_DOUBLE: u8 = 6;
pub const TAG_STRING: u8 = 8;
pub const TAG_LIST: u8 = 9;
pub const TAG_COMPOUND: u8 = 10;
pub const TAG_INT_ARRAY: u8 = 11;

// Bounds recursion on adversarial input; deeper documents fail cleanly
// instead of exhausting the stack.
const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<NbtTag>),
    /// Insertion order is significant and preserved across round-trips.
    Compound(Vec<(String, NbtTag)>),
    IntArray(Vec<i32>),
}

impl NbtTag {
    pub fn tag_id(&self) -> u8 {
        match self {
            NbtTag::Byte(_) => TAG_BYTE,
            NbtTag::Short(_) => TAG_SHORT,
            NbtTag::Int(_) => TAG_INT,
            NbtTag::Long(_) => TAG_LONG,
            NbtTag::Float(_) => TAG_FLOAT,
            NbtTag::Double(_) => TAG_DOUBLE,
            NbtTag::String(_) => TAG_STRING,
            NbtTag::List(_) => TAG_LIST,
            NbtTag::Compound(_) => TAG_COMPOUND,
            NbtTag::IntArray(_) => TAG_INT_ARRAY,
        }
    }

    /// Child lookup for compound tags; `None` for every other variant.
    pub fn get(&self, name: &str) -> Option<&NbtTag> {
        match self {
            NbtTag::Compound(entries) => entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, tag)| tag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NbtTag::String(s) => Some(s),
            _ => None,
        }
    }

    fn read_payload(tag: u8, r: &mut ByteReader<'_>, depth: usize) -> Result<NbtTag> {
        if depth > MAX_DEPTH {
            return Err(ProtocolError::Malformed(format!(
                "NBT document nested deeper than {} levels",
                MAX_DEPTH
            )));
        }
        match tag {
            TAG_BYTE => Ok(NbtTag::Byte(r.read_i8()?)),
            TAG_SHORT => Ok(NbtTag::Short(r.read_i16le()?)),
            TAG_INT => Ok(NbtTag::Int(r.read_i32le()?)),
            TAG_LONG => Ok(NbtTag::Long(r.read_i64le()?)),
            TAG_FLOAT => Ok(NbtTag::Float(r.read_f32le()?)),
            TAG_DOUBLE => Ok(NbtTag::Double(r.read_f64le()?)),
            TAG_STRING => Ok(NbtTag::String(read_name(r)?)),
            TAG_LIST => {
                let element_tag = r.read_u8()?;
                let count = r.read_i32le()?;
                if count < 0 {
                    return Err(ProtocolError::NegativeLength {
                        len: count as i64,
                        context: "NBT list",
                    });
                }
                if count > 0 && element_tag == TAG_END {
                    return Err(ProtocolError::UnexpectedNbtTag {
                        tag: element_tag,
                        context: "non-empty list element type",
                    });
                }
                let mut elements = Vec::new();
                for _ in 0..count {
                    elements.push(Self::read_payload(element_tag, r, depth + 1)?);
                }
                Ok(NbtTag::List(elements))
            }
            TAG_COMPOUND => {
                let mut entries = Vec::new();
                loop {
                    let child_tag = r.read_u8()?;
                    if child_tag == TAG_END {
                        break;
                    }
                    let name = read_name(r)?;
                    let value = Self::read_payload(child_tag, r, depth + 1)?;
                    entries.push((name, value));
                }
                Ok(NbtTag::Compound(entries))
            }
            TAG_INT_ARRAY => {
                let count = r.read_i32le()?;
                if count < 0 {
                    return Err(ProtocolError::NegativeLength {
                        len: count as i64,
                        context: "NBT int array",
                    });
                }
                let mut values = Vec::new();
                for _ in 0..count {
                    values.push(r.read_i32le()?);
                }
                Ok(NbtTag::IntArray(values))
            }
            other => Err(ProtocolError::UnexpectedNbtTag {
                tag: other,
                context: "tag payload",
            }),
        }
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        match self {
            NbtTag::Byte(v) => w.write_i8(*v),
            NbtTag::Short(v) => w.write_i16le(*v),
            NbtTag::Int(v) => w.write_i32le(*v),
            NbtTag::Long(v) => w.write_i64le(*v),
            NbtTag::Float(v) => w.write_f32le(*v),
            NbtTag::Double(v) => w.write_f64le(*v),
            NbtTag::String(s) => write_name(w, s)?,
            NbtTag::List(elements) => {
                let element_tag = elements.first().map(NbtTag::tag_id).unwrap_or(TAG_END);
                for element in elements {
                    if element.tag_id() != element_tag {
                        return Err(ProtocolError::Malformed(format!(
                            "NBT list mixes tag {} with tag {}",
                            element_tag,
                            element.tag_id()
                        )));
                    }
                }
                w.write_u8(element_tag);
                w.write_i32le(elements.len() as i32);
                for element in elements {
                    element.write_payload(w)?;
                }
            }
            NbtTag::Compound(entries) => {
                for (name, value) in entries {
                    w.write_u8(value.tag_id());
                    write_name(w, name)?;
                    value.write_payload(w)?;
                }
                w.write_u8(TAG_END);
            }
            NbtTag::IntArray(values) => {
                w.write_i32le(values.len() as i32);
                for v in values {
                    w.write_i32le(*v);
                }
            }
        }
        Ok(())
    }

    /// Diagnostic view of the tree. Lossy (floats that are not finite become
    /// null), intended for logging and packet dumps, never for the wire.
    pub fn to_json(&self) -> JsonValue {
        match self {
            NbtTag::Byte(v) => JsonValue::Number((*v).into()),
            NbtTag::Short(v) => JsonValue::Number((*v).into()),
            NbtTag::Int(v) => JsonValue::Number((*v).into()),
            NbtTag::Long(v) => JsonValue::Number((*v).into()),
            NbtTag::Float(v) => serde_json::Number::from_f64(*v as f64)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            NbtTag::Double(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            NbtTag::String(s) => JsonValue::String(s.clone()),
            NbtTag::List(elements) => {
                JsonValue::Array(elements.iter().map(NbtTag::to_json).collect())
            }
            NbtTag::Compound(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            NbtTag::IntArray(values) => {
                JsonValue::Array(values.iter().map(|v| JsonValue::Number((*v).into())).collect())
            }
        }
    }
}

fn read_name(r: &mut ByteReader<'_>) -> Result<String> {
    let len = r.read_u16le()? as usize;
    let bytes = r.read_bytes(len)?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn write_name(w: &mut ByteWriter, name: &str) -> Result<()> {
    if name.len() > u16::MAX as usize {
        return Err(ProtocolError::Malformed(format!(
            "NBT string of {} bytes exceeds the u16 length prefix",
            name.len()
        )));
    }
    w.write_u16le(name.len() as u16);
    w.write_bytes(name.as_bytes());
    Ok(())
}

/// The stable wrapper around a document: type tag, root name (conventionally
/// empty), then the root payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRoot {
    pub name: String,
    pub tag: NbtTag,
}

impl TreeRoot {
    pub fn new(tag: NbtTag) -> Self {
        Self {
            name: String::new(),
            tag,
        }
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let tag = r.read_u8()?;
        if tag == TAG_END {
            return Err(ProtocolError::UnexpectedNbtTag {
                tag,
                context: "document root",
            });
        }
        let name = read_name(r)?;
        let payload = NbtTag::read_payload(tag, r, 0)?;
        Ok(Self { name, tag: payload })
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_u8(self.tag.tag_id());
        write_name(w, &self.name)?;
        self.tag.write_payload(w)
    }
}

/// A tree paired with its encoded byte form, computed once and reused on
/// every later write. The wrapped root is immutable; producing a different
/// document means constructing a new snapshot.
#[derive(Debug)]
pub struct CacheableNbt {
    root: TreeRoot,
    encoded: OnceLock<Bytes>,
}

impl CacheableNbt {
    pub fn new(root: TreeRoot) -> Self {
        Self {
            root,
            encoded: OnceLock::new(),
        }
    }

    pub fn root(&self) -> &TreeRoot {
        &self.root
    }

    /// The cached encoding, computing it on first use. Concurrent first uses
    /// recompute identical bytes and one of them wins the cache slot.
    pub fn encoded(&self) -> Result<&Bytes> {
        if let Some(bytes) = self.encoded.get() {
            return Ok(bytes);
        }
        let mut w = ByteWriter::new();
        self.root.write(&mut w)?;
        let bytes = w.into_bytes();
        Ok(self.encoded.get_or_init(move || bytes))
    }
}

impl From<TreeRoot> for CacheableNbt {
    fn from(root: TreeRoot) -> Self {
        Self::new(root)
    }
}

impl Clone for CacheableNbt {
    fn clone(&self) -> Self {
        let encoded = OnceLock::new();
        if let Some(bytes) = self.encoded.get() {
            let _ = encoded.set(bytes.clone());
        }
        Self {
            root: self.root.clone(),
            encoded,
        }
    }
}

// Equality is on the document value; the cache is derived state.
impl PartialEq for CacheableNbt {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_compound() -> TreeRoot {
        TreeRoot::new(NbtTag::Compound(vec![
            ("byte".into(), NbtTag::Byte(-3)),
            ("short".into(), NbtTag::Short(0x1234)),
            ("int".into(), NbtTag::Int(-100_000)),
            ("long".into(), NbtTag::Long(1 << 40)),
            ("float".into(), NbtTag::Float(0.5)),
            ("double".into(), NbtTag::Double(-2.25)),
            ("string".into(), NbtTag::String("hello".into())),
            (
                "list".into(),
                NbtTag::List(vec![
                    NbtTag::Compound(vec![("a".into(), NbtTag::Byte(1))]),
                    NbtTag::Compound(vec![("b".into(), NbtTag::Byte(2))]),
                    NbtTag::Compound(vec![("c".into(), NbtTag::Byte(3))]),
                ]),
            ),
            ("ints".into(), NbtTag::IntArray(vec![1, 2, 3, 4, 5])),
        ]))
    }

    fn encode(root: &TreeRoot) -> Vec<u8> {
        let mut w = ByteWriter::new();
        root.write(&mut w).unwrap();
        w.into_bytes().to_vec()
    }

    #[test]
    fn test_document_fidelity() {
        // encode -> decode -> encode must reproduce the exact bytes.
        let root = sample_compound();
        let first = encode(&root);
        let mut r = ByteReader::new(&first);
        let decoded = TreeRoot::read(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        assert_eq!(decoded, root);
        assert_eq!(encode(&decoded), first);
    }

    #[test]
    fn test_compound_order_preserved() {
        let root = TreeRoot::new(NbtTag::Compound(vec![
            ("z".into(), NbtTag::Byte(1)),
            ("a".into(), NbtTag::Byte(2)),
        ]));
        let bytes = encode(&root);
        let mut r = ByteReader::new(&bytes);
        let decoded = TreeRoot::read(&mut r).unwrap();
        match decoded.tag {
            NbtTag::Compound(entries) => {
                assert_eq!(entries[0].0, "z");
                assert_eq!(entries[1].0, "a");
            }
            other => panic!("expected compound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_list_uses_end_tag() {
        let root = TreeRoot::new(NbtTag::Compound(vec![(
            "empty".into(),
            NbtTag::List(vec![]),
        )]));
        let bytes = encode(&root);
        let mut r = ByteReader::new(&bytes);
        assert_eq!(TreeRoot::read(&mut r).unwrap(), root);
    }

    #[test]
    fn test_mixed_list_rejected_on_encode() {
        let root = TreeRoot::new(NbtTag::List(vec![NbtTag::Byte(1), NbtTag::Int(2)]));
        let mut w = ByteWriter::new();
        assert!(root.write(&mut w).is_err());
    }

    #[test]
    fn test_unexpected_tag_fails() {
        // Tag 7 (byte array) is not part of this wire format.
        let data = [7u8, 0, 0];
        let mut r = ByteReader::new(&data);
        assert!(TreeRoot::read(&mut r).is_err());
    }

    #[test]
    fn test_negative_list_count_fails() {
        let mut w = ByteWriter::new();
        w.write_u8(TAG_LIST);
        w.write_u16le(0); // root name
        w.write_u8(TAG_BYTE);
        w.write_i32le(-1);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        match TreeRoot::read(&mut r) {
            Err(ProtocolError::NegativeLength { len, .. }) => assert_eq!(len, -1),
            other => panic!("expected negative length, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_truncated_payload_fails() {
        let bytes = encode(&sample_compound());
        let mut r = ByteReader::new(&bytes[..bytes.len() - 4]);
        assert!(TreeRoot::read(&mut r).is_err());
    }

    #[test]
    fn test_cacheable_encoding_reused() {
        let doc = CacheableNbt::new(sample_compound());
        let first = doc.encoded().unwrap().clone();
        let second = doc.encoded().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.to_vec(), encode(doc.root()));
    }

    #[test]
    fn test_clone_carries_cache() {
        let doc = CacheableNbt::new(sample_compound());
        let bytes = doc.encoded().unwrap().clone();
        let copy = doc.clone();
        assert_eq!(copy.encoded().unwrap(), &bytes);
        assert_eq!(copy, doc);
    }

    #[test]
    fn test_to_json_shape() {
        let root = sample_compound();
        let json = root.tag.to_json();
        assert_eq!(json["byte"], serde_json::json!(-3));
        assert_eq!(json["string"], serde_json::json!("hello"));
        assert_eq!(json["ints"], serde_json::json!([1, 2, 3, 4, 5]));
    }
}
