use std::collections::HashMap;

use crate::entities::{AliasTable, GuildMember};
use crate::services::normalize_name;
use crate::value_objects::{MemberId, Resolution};

/// Normalized name -> members recognisable by that name.
///
/// Built from a fresh membership snapshot for every resolution pass; a key
/// with more than one member is ambiguous and never resolves.
#[derive(Debug, Clone, Default)]
pub struct MemberIndex {
    buckets: HashMap<String, Vec<MemberId>>,
}

impl MemberIndex {
    pub fn build<'a>(members: impl IntoIterator<Item = &'a GuildMember>) -> Self {
        let mut index = Self::default();
        for member in members {
            for name in member.names() {
                index.insert(name, &member.id);
            }
        }
        index
    }

    pub fn insert(&mut self, name: &str, member_id: &MemberId) {
        let key = normalize_name(name);
        if key.is_empty() {
            return;
        }
        let bucket = self.buckets.entry(key).or_default();
        if !bucket.contains(member_id) {
            bucket.push(member_id.clone());
        }
    }

    pub fn candidates(&self, key: &str) -> &[MemberId] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Maps an external player name to a single member, honouring aliases.
    pub fn resolve(&self, playername: &str, aliases: &AliasTable) -> Resolution {
        let lookup = aliases
            .get(playername)
            .map(String::as_str)
            .unwrap_or(playername);
        match self.candidates(&normalize_name(lookup)) {
            [] => Resolution::NotFound,
            [member_id] => Resolution::Linked {
                member_id: member_id.clone(),
            },
            many => Resolution::Ambiguous {
                candidates: many.to_vec(),
            },
        }
    }
}
