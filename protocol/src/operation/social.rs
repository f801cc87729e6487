//! Content and social operations. These need only posting authority, except
//! `custom_json`, which asks for whatever the payload declares.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{OperationKind, UserOperation};
use crate::authority::AuthorityRequirement;
use crate::codec::{write_i16, write_string, write_varint, CodecError, Reader};
use crate::config::{MAX_CUSTOM_ID_LENGTH, MAX_VOTE_WEIGHT};
use crate::types::AccountName;
use crate::validation::{ValidationContext, ValidationError};

// ---------------------------------------------------------------------------
// vote (0)
// ---------------------------------------------------------------------------

/// Votes on a post or comment. `weight` is in basis points: `10000` is a
/// full upvote, `-10000` a full downvote, `0` removes the vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: AccountName,
    pub author: AccountName,
    pub permlink: String,
    pub weight: i16,
}

impl Vote {
    pub fn new(
        voter: impl Into<AccountName>,
        author: impl Into<AccountName>,
        permlink: impl Into<String>,
        weight: i16,
    ) -> Self {
        Self {
            voter: voter.into(),
            author: author.into(),
            permlink: permlink.into(),
            weight,
        }
    }
}

impl UserOperation for Vote {
    const KIND: OperationKind = OperationKind::Vote;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.voter.write_to(out);
        self.author.write_to(out);
        write_string(out, &self.permlink);
        write_i16(out, self.weight);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            voter: AccountName::read_from(reader)?,
            author: AccountName::read_from(reader)?,
            permlink: reader.read_string()?,
            weight: reader.read_i16()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::posting(&self.voter)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.voter)?;
        ctx.account(&self.author)?;
        ctx.permlink(&self.permlink)?;
        if !(-MAX_VOTE_WEIGHT..=MAX_VOTE_WEIGHT).contains(&self.weight) {
            return Err(ValidationError::InvalidWeight {
                weight: self.weight,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// comment (1)
// ---------------------------------------------------------------------------

/// Publishes or edits a post (empty `parent_author`) or a reply.
///
/// For a top-level post, `parent_permlink` is the main tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub parent_author: AccountName,
    pub parent_permlink: String,
    pub author: AccountName,
    pub permlink: String,
    #[serde(default)]
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub json_metadata: String,
}

impl Comment {
    pub fn new(
        parent_author: impl Into<AccountName>,
        parent_permlink: impl Into<String>,
        author: impl Into<AccountName>,
        permlink: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        json_metadata: impl Into<String>,
    ) -> Self {
        Self {
            parent_author: parent_author.into(),
            parent_permlink: parent_permlink.into(),
            author: author.into(),
            permlink: permlink.into(),
            title: title.into(),
            body: body.into(),
            json_metadata: json_metadata.into(),
        }
    }

    pub fn is_root_post(&self) -> bool {
        self.parent_author.is_empty()
    }
}

impl UserOperation for Comment {
    const KIND: OperationKind = OperationKind::Comment;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.parent_author.write_to(out);
        write_string(out, &self.parent_permlink);
        self.author.write_to(out);
        write_string(out, &self.permlink);
        write_string(out, &self.title);
        write_string(out, &self.body);
        write_string(out, &self.json_metadata);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            parent_author: AccountName::read_from(reader)?,
            parent_permlink: reader.read_string()?,
            author: AccountName::read_from(reader)?,
            permlink: reader.read_string()?,
            title: reader.read_string()?,
            body: reader.read_string()?,
            json_metadata: reader.read_string()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::posting(&self.author)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.optional_account(&self.parent_author)?;
        ctx.account(&self.author)?;
        ctx.permlink(&self.parent_permlink)?;
        ctx.permlink(&self.permlink)?;
        ctx.title(&self.title)?;
        if self.body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        if !self.json_metadata.is_empty() {
            ctx.json("json_metadata", &self.json_metadata)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// delete_comment (17)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteComment {
    pub author: AccountName,
    pub permlink: String,
}

impl DeleteComment {
    pub fn new(author: impl Into<AccountName>, permlink: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            permlink: permlink.into(),
        }
    }
}

impl UserOperation for DeleteComment {
    const KIND: OperationKind = OperationKind::DeleteComment;

    fn write_body(&self, out: &mut Vec<u8>) {
        self.author.write_to(out);
        write_string(out, &self.permlink);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            author: AccountName::read_from(reader)?,
            permlink: reader.read_string()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        BTreeSet::from([AuthorityRequirement::posting(&self.author)])
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        ctx.account(&self.author)?;
        ctx.permlink(&self.permlink)
    }
}

// ---------------------------------------------------------------------------
// custom_json (18)
// ---------------------------------------------------------------------------

/// Arbitrary application data. The chain only records it; applications
/// such as follow lists and games interpret the `json` payload by `id`.
///
/// Signers are declared explicitly: every account in `required_auths` must
/// sign with active authority, every account in `required_posting_auths`
/// with posting authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJson {
    #[serde(default)]
    pub required_auths: BTreeSet<AccountName>,
    #[serde(default)]
    pub required_posting_auths: BTreeSet<AccountName>,
    pub id: String,
    pub json: String,
}

impl CustomJson {
    pub fn new(
        required_auths: impl IntoIterator<Item = AccountName>,
        required_posting_auths: impl IntoIterator<Item = AccountName>,
        id: impl Into<String>,
        json: impl Into<String>,
    ) -> Self {
        Self {
            required_auths: required_auths.into_iter().collect(),
            required_posting_auths: required_posting_auths.into_iter().collect(),
            id: id.into(),
            json: json.into(),
        }
    }

    /// A payload signed by one account at posting level, the common case.
    pub fn posting(account: impl Into<AccountName>, id: impl Into<String>, json: impl Into<String>) -> Self {
        Self::new(BTreeSet::new(), [account.into()], id, json)
    }
}

fn write_account_set(out: &mut Vec<u8>, set: &BTreeSet<AccountName>) {
    write_varint(out, set.len() as u64);
    for account in set {
        account.write_to(out);
    }
}

/// Sets arrive sorted and without duplicates from any canonical encoder.
fn read_account_set(reader: &mut Reader<'_>) -> Result<BTreeSet<AccountName>, CodecError> {
    let count = reader.read_length()?;
    let mut set = BTreeSet::new();
    let mut previous: Option<AccountName> = None;
    for _ in 0..count {
        let account = AccountName::read_from(reader)?;
        if previous.as_ref().is_some_and(|p| *p >= account) {
            return Err(CodecError::malformed(format!(
                "account set is not strictly ascending at `{}`",
                account
            )));
        }
        previous = Some(account.clone());
        set.insert(account);
    }
    Ok(set)
}

impl UserOperation for CustomJson {
    const KIND: OperationKind = OperationKind::CustomJson;

    fn write_body(&self, out: &mut Vec<u8>) {
        write_account_set(out, &self.required_auths);
        write_account_set(out, &self.required_posting_auths);
        write_string(out, &self.id);
        write_string(out, &self.json);
    }

    fn read_body(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            required_auths: read_account_set(reader)?,
            required_posting_auths: read_account_set(reader)?,
            id: reader.read_string()?,
            json: reader.read_string()?,
        })
    }

    fn required_authorities(&self) -> BTreeSet<AuthorityRequirement> {
        let active = self.required_auths.iter().map(AuthorityRequirement::active);
        let posting = self
            .required_posting_auths
            .iter()
            .map(AuthorityRequirement::posting);
        active.chain(posting).collect()
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
        if self.required_auths.is_empty() && self.required_posting_auths.is_empty() {
            return Err(ValidationError::MissingAuthorities);
        }
        for account in self.required_auths.iter().chain(&self.required_posting_auths) {
            ctx.account(account)?;
        }
        if self.id.len() > MAX_CUSTOM_ID_LENGTH {
            return Err(ValidationError::CustomIdTooLong {
                length: self.id.len(),
                max: MAX_CUSTOM_ID_LENGTH,
            });
        }
        ctx.json("json", &self.json)
    }
}
