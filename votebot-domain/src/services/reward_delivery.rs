use serde::Serialize;

use crate::entities::{Announcement, RankedPlayer};
use crate::value_objects::{MemberId, Resolution};

pub const DEFAULT_ITEM_COMMAND_TEMPLATE: &str =
    "/admininventaire donner membre:{mention} objet:\"{item}\" quantité:{qty}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditInstruction {
    pub rank: u32,
    pub playername: String,
    pub member_id: MemberId,
    pub amount: u64,
}

/// Diamonds that cannot be credited automatically because the voter has no
/// linked member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualCredit {
    pub rank: u32,
    pub playername: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewardPlan {
    pub credits: Vec<CreditInstruction>,
    pub manual: Vec<ManualCredit>,
    pub item_commands: Vec<String>,
}

/// Splits the rewards of a composed announcement into ledger credits for
/// linked voters, manual credits for unlinked ones and item-grant commands
/// for the admins. Zero amounts are dropped.
pub fn plan_reward_delivery(announcement: &Announcement, item_command_template: &str) -> RewardPlan {
    let mut plan = RewardPlan::default();

    for entry in &announcement.winners {
        let mention = command_mention(&entry.player, &entry.resolution);
        for item in &entry.reward.items {
            plan.item_commands.push(render_item_command(
                item_command_template,
                &mention,
                &item.item,
                item.quantity,
            ));
        }
        let diamonds = entry.reward.diamonds.unwrap_or(0);
        push_credit(&mut plan, entry.rank, &entry.player, &entry.resolution, diamonds);
    }
    for entry in &announcement.participants {
        push_credit(&mut plan, entry.rank, &entry.player, &entry.resolution, entry.diamonds);
    }
    plan
}

fn push_credit(
    plan: &mut RewardPlan,
    rank: u32,
    player: &RankedPlayer,
    resolution: &Resolution,
    amount: u64,
) {
    if amount == 0 {
        return;
    }
    match resolution.member_id() {
        Some(member_id) => plan.credits.push(CreditInstruction {
            rank,
            playername: player.playername.clone(),
            member_id: member_id.clone(),
            amount,
        }),
        None => plan.manual.push(ManualCredit {
            rank,
            playername: player.playername.clone(),
            amount,
        }),
    }
}

fn command_mention(player: &RankedPlayer, resolution: &Resolution) -> String {
    resolution
        .member_id()
        .map(MemberId::mention)
        .unwrap_or_else(|| player.playername.clone())
}

pub fn render_item_command(template: &str, mention: &str, item: &str, quantity: u64) -> String {
    template
        .replace("{mention}", mention)
        .replace("{item}", item)
        .replace("{qty}", &quantity.to_string())
}

/// Admin-facing summary of one delivery: commands to paste and every amount
/// that still has to be paid by hand, including failed ledger credits.
pub fn render_admin_log(
    results_label: &str,
    plan: &RewardPlan,
    failed: &[CreditInstruction],
    diamond_icon: &str,
) -> String {
    let mut lines = vec![format!("**Récompenses votes {}**", results_label)];

    if !plan.item_commands.is_empty() {
        lines.push(String::new());
        lines.push("Commandes DraftBot :".to_string());
        lines.extend(plan.item_commands.iter().cloned());
    }

    let pending = plan
        .manual
        .iter()
        .map(|entry| format!("#{} {} : {} {}", entry.rank, entry.playername, entry.amount, diamond_icon))
        .chain(failed.iter().map(|entry| {
            format!(
                "#{} {} ({}) : {} {}",
                entry.rank,
                entry.playername,
                entry.member_id.mention(),
                entry.amount,
                diamond_icon
            )
        }))
        .collect::<Vec<_>>();
    if !pending.is_empty() {
        lines.push(String::new());
        lines.push("Diamants à créditer manuellement :".to_string());
        lines.extend(pending);
    }

    let credited = plan.credits.len().saturating_sub(failed.len());
    lines.push(String::new());
    lines.push(format!("Crédits automatiques réussis : {}/{}", credited, plan.credits.len()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AliasTable, GuildMember, ItemQuantity, RewardTable, RewardTier, StyleConfig,
    };
    use crate::services::{compose_announcement, AnnouncementInput, MemberIndex};
    use crate::value_objects::Period;

    fn fixture_announcement() -> Announcement {
        let ranking = vec![
            RankedPlayer::new("Alice", 30),
            RankedPlayer::new("Ghost", 20),
            RankedPlayer::new("Bob", 4),
            RankedPlayer::new("Nobody", 2),
        ];
        let members = vec![GuildMember::new("11", "Alice", "alice"), GuildMember::new("22", "Bob", "bob")];
        let index = MemberIndex::build(&members);
        let rewards = RewardTable::new(vec![
            RewardTier::items(1, vec![ItemQuantity::new("🦖", 6), ItemQuantity::new("🍓", 150)]),
            RewardTier::diamonds(2, 4000),
        ])
        .expect("valid rewards");
        let aliases = AliasTable::new();
        let style = StyleConfig::default();
        compose_announcement(AnnouncementInput {
            period: Period::new(2025, 7).expect("valid period"),
            ranking: &ranking,
            index: &index,
            aliases: &aliases,
            rewards: &rewards,
            style: &style,
            diamonds_per_vote: 100,
            credits_enabled: true,
        })
    }

    #[test]
    fn plans_credits_manual_payouts_and_item_commands() {
        let plan = plan_reward_delivery(&fixture_announcement(), DEFAULT_ITEM_COMMAND_TEMPLATE);

        assert_eq!(
            plan.item_commands,
            vec![
                "/admininventaire donner membre:<@11> objet:\"🦖\" quantité:6".to_string(),
                "/admininventaire donner membre:<@11> objet:\"🍓\" quantité:150".to_string(),
            ]
        );
        assert_eq!(plan.credits.len(), 1);
        assert_eq!(plan.credits[0].member_id, MemberId("22".to_string()));
        assert_eq!(plan.credits[0].amount, 400);
        assert_eq!(
            plan.manual,
            vec![
                ManualCredit { rank: 2, playername: "Ghost".to_string(), amount: 4000 },
                ManualCredit { rank: 4, playername: "Nobody".to_string(), amount: 200 },
            ]
        );
    }

    #[test]
    fn admin_log_lists_commands_and_pending_payouts() {
        let plan = plan_reward_delivery(&fixture_announcement(), "give {mention} {item} {qty}");
        let failed = plan.credits.clone();
        let text = render_admin_log("JUIN 2025", &plan, &failed, "💎");

        assert!(text.starts_with("**Récompenses votes JUIN 2025**"));
        assert!(text.contains("give <@11> 🦖 6"));
        assert!(text.contains("#2 Ghost : 4000 💎"));
        assert!(text.contains("#3 Bob (<@22>) : 400 💎"));
        assert!(text.ends_with("Crédits automatiques réussis : 0/1"));
    }

    #[test]
    fn unlinked_winner_gets_raw_name_in_commands() {
        assert_eq!(
            render_item_command(DEFAULT_ITEM_COMMAND_TEMPLATE, "Ghost", "🦖", 4),
            "/admininventaire donner membre:Ghost objet:\"🦖\" quantité:4"
        );
    }
}
