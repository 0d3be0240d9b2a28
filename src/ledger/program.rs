//! Typed handle over the guestbook program described by an IDL

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use solana_instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use crate::constants::{ADD_COMMENT_METHOD, BASE_ACCOUNT_ARG, BASE_ACCOUNT_TYPE, COMMENT_LIST_FIELD};
use crate::ledger::idl::{Idl, IdlError};
use crate::ledger::LedgerError;
use crate::models::Comment;

/// Decoded contents of the base account
#[derive(Debug, Clone, PartialEq)]
pub struct BaseAccount {
    pub comment_list: Vec<Comment>,
}

/// On-chain `ItemStruct` layout, field names as the IDL spells them
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    comment_text: String,
    timestamp: i64,
    user_address: String,
}

impl BaseAccount {
    pub fn from_value(value: &Value) -> Result<Self, LedgerError> {
        let list = value
            .get(COMMENT_LIST_FIELD)
            .cloned()
            .ok_or_else(|| LedgerError::Decode(format!("missing field '{}'", COMMENT_LIST_FIELD)))?;
        let items: Vec<RawItem> =
            serde_json::from_value(list).map_err(|e| LedgerError::Decode(e.to_string()))?;

        let comment_list = items
            .into_iter()
            .map(|item| {
                let author = Pubkey::from_str(&item.user_address)
                    .map_err(|_| LedgerError::Decode(format!("bad author '{}'", item.user_address)))?;
                Ok(Comment::new(item.comment_text, item.timestamp, author))
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(BaseAccount { comment_list })
    }
}

/// Program id plus its interface document
#[derive(Debug, Clone)]
pub struct Program {
    idl: Arc<Idl>,
    program_id: Pubkey,
}

impl Program {
    pub fn new(idl: Arc<Idl>, program_id: Pubkey) -> Self {
        Program { idl, program_id }
    }

    /// Use the address the IDL declares in its metadata
    pub fn from_idl(idl: Arc<Idl>) -> Result<Self, IdlError> {
        let program_id = idl.program_id()?;
        Ok(Program { idl, program_id })
    }

    pub fn id(&self) -> Pubkey {
        self.program_id
    }

    /// Build an instruction for `method`.
    ///
    /// Accounts are resolved by their IDL name from `accounts`; a signer
    /// account that is not supplied falls back to `payer`, the way a
    /// wallet-backed provider fills in the user.
    pub fn instruction(
        &self,
        method: &str,
        args: &[Value],
        accounts: &HashMap<&str, Pubkey>,
        payer: &Pubkey,
    ) -> Result<Instruction, LedgerError> {
        let ix = self.idl.instruction(method)?;
        let data = self.idl.encode_instruction(method, args)?;

        let metas = ix
            .accounts
            .iter()
            .map(|item| {
                let key = match accounts.get(item.name.as_str()) {
                    Some(key) => *key,
                    None if item.is_signer => *payer,
                    None => return Err(LedgerError::MissingAccount(item.name.clone())),
                };
                let is_signer = item.is_signer || key == *payer;
                Ok(if item.is_mut {
                    AccountMeta::new(key, is_signer)
                } else {
                    AccountMeta::new_readonly(key, is_signer)
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(Instruction::new_with_bytes(self.program_id, &data, metas))
    }

    /// `addComment(text, { accounts: { baseAccount } })`
    pub fn add_comment_instruction(
        &self,
        text: &str,
        base_account: &Pubkey,
        payer: &Pubkey,
    ) -> Result<Instruction, LedgerError> {
        let accounts = HashMap::from([(BASE_ACCOUNT_ARG, *base_account)]);
        self.instruction(ADD_COMMENT_METHOD, &[json!(text)], &accounts, payer)
    }

    /// Decode raw base account data
    pub fn decode_base_account(&self, data: &[u8]) -> Result<BaseAccount, LedgerError> {
        let value = self.idl.decode_account(BASE_ACCOUNT_TYPE, data)?;
        BaseAccount::from_value(&value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::constants::BUNDLED_IDL;
    use crate::ledger::idl::{account_discriminator, instruction_discriminator};
    use borsh::BorshSerialize;

    #[derive(BorshSerialize)]
    struct ItemFixture {
        comment_text: String,
        timestamp: i64,
        user_address: [u8; 32],
    }

    #[derive(BorshSerialize)]
    struct BaseAccountFixture {
        total_comments: u64,
        comment_list: Vec<ItemFixture>,
    }

    pub(crate) fn key(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    pub(crate) fn program() -> Program {
        Program::from_idl(Arc::new(Idl::from_json(BUNDLED_IDL).unwrap())).unwrap()
    }

    /// Raw account bytes as the program would store them
    pub(crate) fn account_bytes(comments: &[Comment]) -> Vec<u8> {
        let fixture = BaseAccountFixture {
            total_comments: comments.len() as u64,
            comment_list: comments
                .iter()
                .map(|c| ItemFixture {
                    comment_text: c.text.clone(),
                    timestamp: c.timestamp,
                    user_address: c.author.to_bytes(),
                })
                .collect(),
        };
        let mut data = account_discriminator("BaseAccount").to_vec();
        data.extend(borsh::to_vec(&fixture).unwrap());
        data.resize(data.len() + 32, 0);
        data
    }

    #[test]
    fn test_decode_base_account_keeps_stored_order() {
        let x = key(1);
        let y = key(2);
        let stored = vec![Comment::new("a", 100, x), Comment::new("b", 200, y)];

        let account = program().decode_base_account(&account_bytes(&stored)).unwrap();
        assert_eq!(account.comment_list, stored);
    }

    #[test]
    fn test_decode_empty_base_account() {
        let account = program().decode_base_account(&account_bytes(&[])).unwrap();
        assert!(account.comment_list.is_empty());
    }

    #[test]
    fn test_add_comment_instruction_layout() {
        let program = program();
        let base = key(3);
        let payer = key(4);

        let ix = program.add_comment_instruction("hello", &base, &payer).unwrap();
        assert_eq!(ix.program_id, program.id());
        assert_eq!(&ix.data[..8], &instruction_discriminator("addComment"));
        assert_eq!(&ix.data[12..], b"hello");

        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, base);
        assert!(ix.accounts[0].is_writable);
        assert!(!ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, payer);
        assert!(ix.accounts[1].is_signer);
    }

    #[test]
    fn test_missing_non_signer_account_is_an_error() {
        let program = program();
        let payer = key(5);
        let err = program
            .instruction("addComment", &[json!("hi")], &HashMap::new(), &payer)
            .unwrap_err();
        assert!(matches!(err, LedgerError::MissingAccount(name) if name == "baseAccount"));
    }

    #[test]
    fn test_bad_author_is_a_decode_error() {
        let value = json!({ "commentList": [
            { "commentText": "x", "timestamp": 1, "userAddress": "not-a-key" }
        ]});
        assert!(matches!(
            BaseAccount::from_value(&value),
            Err(LedgerError::Decode(_))
        ));
    }
}
