//! Interface description document (Anchor IDL) parsing and Borsh layout codec
//!
//! The IDL tells us which remote calls a program exposes, what arguments they
//! take and how its accounts are laid out. Values cross the codec as
//! `serde_json::Value` so callers can map them onto their own types.

use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Anchor discriminators are the first 8 bytes of a sha256 preimage
pub const DISCRIMINATOR_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum IdlError {
    #[error("invalid interface document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("interface document has no program address")]
    MissingAddress,
    #[error("invalid program address '{0}'")]
    InvalidAddress(String),
    #[error("unknown instruction '{0}'")]
    UnknownInstruction(String),
    #[error("unknown account type '{0}'")]
    UnknownAccount(String),
    #[error("unknown defined type '{0}'")]
    UnknownType(String),
    #[error("instruction '{name}' takes {expected} arguments, got {got}")]
    ArgCount {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("account data does not start with the '{0}' discriminator")]
    Discriminator(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Idl {
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub instructions: Vec<IdlInstruction>,
    #[serde(default)]
    pub accounts: Vec<IdlTypeDef>,
    #[serde(default)]
    pub types: Vec<IdlTypeDef>,
    #[serde(default)]
    pub metadata: Option<IdlMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlMetadata {
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlInstruction {
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<IdlAccountItem>,
    #[serde(default)]
    pub args: Vec<IdlField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdlAccountItem {
    pub name: String,
    #[serde(default)]
    pub is_mut: bool,
    #[serde(default)]
    pub is_signer: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlTypeDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IdlTypeDefTy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdlTypeDefTy {
    Struct { fields: Vec<IdlField> },
    Enum { variants: Vec<IdlEnumVariant> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdlEnumVariant {
    pub name: String,
    #[serde(default)]
    pub fields: Option<IdlEnumFields>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdlEnumFields {
    Named(Vec<IdlField>),
    Tuple(Vec<IdlType>),
}

/// Field types, in the legacy Anchor IDL spelling
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdlType {
    Primitive(PrimitiveType),
    Vec { vec: Box<IdlType> },
    Option { option: Box<IdlType> },
    Array { array: (Box<IdlType>, usize) },
    Defined { defined: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveType {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    F32,
    F64,
    String,
    PublicKey,
    Bytes,
}

impl Idl {
    pub fn from_json(text: &str) -> Result<Self, IdlError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Program address declared in `metadata.address`
    pub fn program_id(&self) -> Result<Pubkey, IdlError> {
        let address = self
            .metadata
            .as_ref()
            .and_then(|m| m.address.as_deref())
            .ok_or(IdlError::MissingAddress)?;
        Pubkey::from_str(address).map_err(|_| IdlError::InvalidAddress(address.to_string()))
    }

    pub fn instruction(&self, name: &str) -> Result<&IdlInstruction, IdlError> {
        self.instructions
            .iter()
            .find(|ix| ix.name == name)
            .ok_or_else(|| IdlError::UnknownInstruction(name.to_string()))
    }

    pub fn account(&self, name: &str) -> Result<&IdlTypeDef, IdlError> {
        self.accounts
            .iter()
            .find(|acc| acc.name == name)
            .ok_or_else(|| IdlError::UnknownAccount(name.to_string()))
    }

    fn defined(&self, name: &str) -> Result<&IdlTypeDef, IdlError> {
        self.types
            .iter()
            .chain(self.accounts.iter())
            .find(|def| def.name == name)
            .ok_or_else(|| IdlError::UnknownType(name.to_string()))
    }

    /// Serialize instruction data: discriminator followed by the Borsh encoded args
    pub fn encode_instruction(&self, name: &str, args: &[Value]) -> Result<Vec<u8>, IdlError> {
        let ix = self.instruction(name)?;
        if ix.args.len() != args.len() {
            return Err(IdlError::ArgCount {
                name: name.to_string(),
                expected: ix.args.len(),
                got: args.len(),
            });
        }

        let mut data = instruction_discriminator(name).to_vec();
        for (field, value) in ix.args.iter().zip(args) {
            self.encode_value(&field.ty, value, &mut data)
                .map_err(|e| IdlError::Encode(format!("{}: {}", field.name, e)))?;
        }
        Ok(data)
    }

    /// Check the account discriminator and decode the remaining bytes
    pub fn decode_account(&self, name: &str, data: &[u8]) -> Result<Value, IdlError> {
        let def = self.account(name)?;
        let discriminator = account_discriminator(name);
        if data.len() < DISCRIMINATOR_LEN || data[..DISCRIMINATOR_LEN] != discriminator {
            return Err(IdlError::Discriminator(name.to_string()));
        }

        // Accounts are allocated with spare space, trailing bytes are ignored
        let mut buf = &data[DISCRIMINATOR_LEN..];
        self.decode_typedef(def, &mut buf)
    }

    fn decode_typedef(&self, def: &IdlTypeDef, buf: &mut &[u8]) -> Result<Value, IdlError> {
        match &def.ty {
            IdlTypeDefTy::Struct { fields } => self.decode_fields(fields, buf),
            IdlTypeDefTy::Enum { variants } => {
                let tag = read::<u8>(buf)? as usize;
                let variant = variants
                    .get(tag)
                    .ok_or_else(|| IdlError::Decode(format!("{}: bad variant {}", def.name, tag)))?;
                let inner = match &variant.fields {
                    None => return Ok(Value::String(variant.name.clone())),
                    Some(IdlEnumFields::Named(fields)) => self.decode_fields(fields, buf)?,
                    Some(IdlEnumFields::Tuple(types)) => Value::Array(
                        types
                            .iter()
                            .map(|ty| self.decode_value(ty, buf))
                            .collect::<Result<_, _>>()?,
                    ),
                };
                let mut map = Map::new();
                map.insert(variant.name.clone(), inner);
                Ok(Value::Object(map))
            }
        }
    }

    fn decode_fields(&self, fields: &[IdlField], buf: &mut &[u8]) -> Result<Value, IdlError> {
        let mut map = Map::new();
        for field in fields {
            let value = self.decode_value(&field.ty, buf)?;
            map.insert(field.name.clone(), value);
        }
        Ok(Value::Object(map))
    }

    fn decode_value(&self, ty: &IdlType, buf: &mut &[u8]) -> Result<Value, IdlError> {
        match ty {
            IdlType::Primitive(p) => decode_primitive(*p, buf),
            IdlType::Vec { vec } => {
                let len = read::<u32>(buf)? as usize;
                let mut items = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    items.push(self.decode_value(vec, buf)?);
                }
                Ok(Value::Array(items))
            }
            IdlType::Option { option } => match read::<u8>(buf)? {
                0 => Ok(Value::Null),
                _ => self.decode_value(option, buf),
            },
            IdlType::Array { array: (inner, len) } => {
                let items = (0..*len)
                    .map(|_| self.decode_value(inner, buf))
                    .collect::<Result<_, _>>()?;
                Ok(Value::Array(items))
            }
            IdlType::Defined { defined } => {
                let def = self.defined(defined)?;
                self.decode_typedef(def, buf)
            }
        }
    }

    fn encode_value(&self, ty: &IdlType, value: &Value, out: &mut Vec<u8>) -> Result<(), IdlError> {
        match ty {
            IdlType::Primitive(p) => encode_primitive(*p, value, out),
            IdlType::Vec { vec } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| IdlError::Encode(String::from("expected an array")))?;
                write(&(items.len() as u32), out)?;
                items.iter().try_for_each(|item| self.encode_value(vec, item, out))
            }
            IdlType::Option { option } => {
                if value.is_null() {
                    write(&0u8, out)
                } else {
                    write(&1u8, out)?;
                    self.encode_value(option, value, out)
                }
            }
            IdlType::Array { array: (inner, len) } => {
                let items = value
                    .as_array()
                    .filter(|items| items.len() == *len)
                    .ok_or_else(|| IdlError::Encode(format!("expected an array of {}", len)))?;
                items.iter().try_for_each(|item| self.encode_value(inner, item, out))
            }
            IdlType::Defined { defined } => match &self.defined(defined)?.ty {
                IdlTypeDefTy::Struct { fields } => {
                    let object = value
                        .as_object()
                        .ok_or_else(|| IdlError::Encode(format!("expected a {} object", defined)))?;
                    for field in fields {
                        let field_value = object.get(&field.name).unwrap_or(&Value::Null);
                        self.encode_value(&field.ty, field_value, out)?;
                    }
                    Ok(())
                }
                IdlTypeDefTy::Enum { variants } => {
                    // Unit variants only, given by name
                    let name = value
                        .as_str()
                        .ok_or_else(|| IdlError::Encode(format!("expected a {} variant name", defined)))?;
                    let tag = variants
                        .iter()
                        .position(|v| v.name == name && v.fields.is_none())
                        .ok_or_else(|| IdlError::Encode(format!("no unit variant {}::{}", defined, name)))?;
                    write(&(tag as u8), out)
                }
            },
        }
    }
}

fn decode_primitive(ty: PrimitiveType, buf: &mut &[u8]) -> Result<Value, IdlError> {
    let value = match ty {
        PrimitiveType::Bool => Value::Bool(read::<bool>(buf)?),
        PrimitiveType::U8 => Value::from(read::<u8>(buf)?),
        PrimitiveType::I8 => Value::from(read::<i8>(buf)?),
        PrimitiveType::U16 => Value::from(read::<u16>(buf)?),
        PrimitiveType::I16 => Value::from(read::<i16>(buf)?),
        PrimitiveType::U32 => Value::from(read::<u32>(buf)?),
        PrimitiveType::I32 => Value::from(read::<i32>(buf)?),
        PrimitiveType::U64 => Value::from(read::<u64>(buf)?),
        PrimitiveType::I64 => Value::from(read::<i64>(buf)?),
        // Wider than JSON numbers, carried as decimal strings
        PrimitiveType::U128 => Value::String(read::<u128>(buf)?.to_string()),
        PrimitiveType::I128 => Value::String(read::<i128>(buf)?.to_string()),
        PrimitiveType::F32 => Number::from_f64(f64::from(read::<f32>(buf)?))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        PrimitiveType::F64 => Number::from_f64(read::<f64>(buf)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        PrimitiveType::String => Value::String(read::<String>(buf)?),
        PrimitiveType::PublicKey => {
            let bytes = read::<[u8; 32]>(buf)?;
            Value::String(Pubkey::new_from_array(bytes).to_string())
        }
        PrimitiveType::Bytes => Value::from(read::<Vec<u8>>(buf)?),
    };
    Ok(value)
}

fn encode_primitive(ty: PrimitiveType, value: &Value, out: &mut Vec<u8>) -> Result<(), IdlError> {
    let mismatch = || IdlError::Encode(format!("{:?} does not fit {:?}", value, ty));
    let unsigned = || value.as_u64().ok_or_else(mismatch);
    let signed = || value.as_i64().ok_or_else(mismatch);

    match ty {
        PrimitiveType::Bool => write(&value.as_bool().ok_or_else(mismatch)?, out),
        PrimitiveType::U8 => write(&u8::try_from(unsigned()?).map_err(|_| mismatch())?, out),
        PrimitiveType::I8 => write(&i8::try_from(signed()?).map_err(|_| mismatch())?, out),
        PrimitiveType::U16 => write(&u16::try_from(unsigned()?).map_err(|_| mismatch())?, out),
        PrimitiveType::I16 => write(&i16::try_from(signed()?).map_err(|_| mismatch())?, out),
        PrimitiveType::U32 => write(&u32::try_from(unsigned()?).map_err(|_| mismatch())?, out),
        PrimitiveType::I32 => write(&i32::try_from(signed()?).map_err(|_| mismatch())?, out),
        PrimitiveType::U64 => write(&unsigned()?, out),
        PrimitiveType::I64 => write(&signed()?, out),
        PrimitiveType::U128 => {
            let v = match value {
                Value::String(s) => s.parse::<u128>().map_err(|_| mismatch())?,
                _ => u128::from(unsigned()?),
            };
            write(&v, out)
        }
        PrimitiveType::I128 => {
            let v = match value {
                Value::String(s) => s.parse::<i128>().map_err(|_| mismatch())?,
                _ => i128::from(signed()?),
            };
            write(&v, out)
        }
        PrimitiveType::F32 => write(&(value.as_f64().ok_or_else(mismatch)? as f32), out),
        PrimitiveType::F64 => write(&value.as_f64().ok_or_else(mismatch)?, out),
        PrimitiveType::String => write(&value.as_str().ok_or_else(mismatch)?.to_string(), out),
        PrimitiveType::PublicKey => {
            let key = value
                .as_str()
                .and_then(|s| Pubkey::from_str(s).ok())
                .ok_or_else(mismatch)?;
            write(&key.to_bytes(), out)
        }
        PrimitiveType::Bytes => {
            let bytes: Vec<u8> = serde_json::from_value(value.clone()).map_err(|_| mismatch())?;
            write(&bytes, out)
        }
    }
}

fn read<T: BorshDeserialize>(buf: &mut &[u8]) -> Result<T, IdlError> {
    T::deserialize(buf).map_err(|e| IdlError::Decode(e.to_string()))
}

fn write<T: BorshSerialize + ?Sized>(value: &T, out: &mut Vec<u8>) -> Result<(), IdlError> {
    value
        .serialize(out)
        .map_err(|e| IdlError::Encode(e.to_string()))
}

/// `addComment` -> `add_comment`
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn sighash(preimage: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(preimage.as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Discriminator prefixed to instruction data: `sha256("global:<snake_name>")[..8]`
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash(&format!("global:{}", to_snake_case(name)))
}

/// Discriminator prefixed to account data: `sha256("account:<Name>")[..8]`
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash(&format!("account:{}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BUNDLED_IDL, BUNDLED_PROGRAM_ID};
    use serde_json::json;

    fn bundled() -> Idl {
        Idl::from_json(BUNDLED_IDL).unwrap()
    }

    #[test]
    fn test_parse_bundled_idl() {
        let idl = bundled();
        assert_eq!(idl.name, "guestbook");
        assert_eq!(idl.program_id().unwrap().to_string(), BUNDLED_PROGRAM_ID);

        let add = idl.instruction("addComment").unwrap();
        assert_eq!(add.args.len(), 1);
        assert_eq!(add.args[0].ty, IdlType::Primitive(PrimitiveType::String));
        assert!(add.accounts.iter().any(|a| a.name == "baseAccount" && a.is_mut));

        assert!(idl.account("BaseAccount").is_ok());
        assert!(matches!(idl.account("Nope"), Err(IdlError::UnknownAccount(_))));
    }

    #[test]
    fn test_discriminators_match_anchor() {
        assert_eq!(
            instruction_discriminator("addComment"),
            [59, 175, 193, 236, 134, 214, 75, 141]
        );
        assert_eq!(
            account_discriminator("BaseAccount"),
            [16, 90, 130, 242, 159, 10, 232, 133]
        );
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("addComment"), "add_comment");
        assert_eq!(to_snake_case("initialize"), "initialize");
        assert_eq!(to_snake_case("setUserHTML"), "set_user_h_t_m_l");
    }

    #[test]
    fn test_encode_add_comment() {
        let data = bundled()
            .encode_instruction("addComment", &[json!("hello")])
            .unwrap();
        assert_eq!(&data[..8], &instruction_discriminator("addComment"));
        assert_eq!(&data[8..12], &5u32.to_le_bytes());
        assert_eq!(&data[12..], b"hello");
    }

    #[test]
    fn test_encode_rejects_wrong_arity_and_type() {
        let idl = bundled();
        assert!(matches!(
            idl.encode_instruction("addComment", &[]),
            Err(IdlError::ArgCount { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            idl.encode_instruction("addComment", &[json!(42)]),
            Err(IdlError::Encode(_))
        ));
        assert!(matches!(
            idl.encode_instruction("removeComment", &[]),
            Err(IdlError::UnknownInstruction(_))
        ));
    }

    #[test]
    fn test_decode_account_rejects_foreign_discriminator() {
        let idl = bundled();
        let data = vec![0u8; 64];
        assert!(matches!(
            idl.decode_account("BaseAccount", &data),
            Err(IdlError::Discriminator(_))
        ));
        assert!(matches!(
            idl.decode_account("BaseAccount", &[1, 2]),
            Err(IdlError::Discriminator(_))
        ));
    }

    #[test]
    fn test_decode_option_enum_and_array() {
        let idl = Idl::from_json(
            r#"{
                "version": "0.1.0",
                "name": "misc",
                "accounts": [{
                    "name": "Misc",
                    "type": { "kind": "struct", "fields": [
                        { "name": "maybe", "type": { "option": "u16" } },
                        { "name": "none", "type": { "option": "u16" } },
                        { "name": "mode", "type": { "defined": "Mode" } },
                        { "name": "pair", "type": { "array": ["u8", 2] } },
                        { "name": "big", "type": "u128" }
                    ]}
                }],
                "types": [{
                    "name": "Mode",
                    "type": { "kind": "enum", "variants": [{ "name": "Off" }, { "name": "On" }] }
                }]
            }"#,
        )
        .unwrap();

        let mut data = account_discriminator("Misc").to_vec();
        data.extend([1, 7, 0]); // Some(7u16)
        data.push(0); // None
        data.push(1); // Mode::On
        data.extend([9, 8]);
        data.extend(5u128.to_le_bytes());
        data.extend([0xAA; 3]); // slack space

        let value = idl.decode_account("Misc", &data).unwrap();
        assert_eq!(
            value,
            json!({ "maybe": 7, "none": null, "mode": "On", "pair": [9, 8], "big": "5" })
        );
    }

    #[test]
    fn test_truncated_data_is_a_decode_error() {
        let idl = bundled();
        let mut data = account_discriminator("BaseAccount").to_vec();
        data.extend([1, 0, 0]);
        assert!(matches!(
            idl.decode_account("BaseAccount", &data),
            Err(IdlError::Decode(_))
        ));
    }
}
