use serde::Serialize;
use tracing::{debug, info, warn};

use votebot_domain::{
    plan_reward_delivery, render_admin_log, split_message, Announcement, CreditInstruction,
    GuildId, OutgoingMessage, MESSAGE_CHAR_LIMIT,
};

use crate::AppState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub credited: usize,
    pub credit_failures: usize,
    pub manual_payouts: usize,
    pub item_commands: usize,
    pub admin_log_sent: bool,
}

/// Pays out an announcement that is already posted and gated.
///
/// Never fails: a ledger or admin-log error is logged and listed for manual
/// handling, the announcement itself stays closed for the month.
pub async fn deliver_rewards(
    state: &AppState,
    guild_id: &GuildId,
    announcement: &Announcement,
) -> DeliveryReport {
    let delivery = &state.config.delivery;
    let plan = plan_reward_delivery(announcement, &delivery.item_command_template);

    let mut unpaid: Vec<CreditInstruction> = Vec::new();
    match &state.reward_ledger {
        Some(ledger) => {
            for credit in &plan.credits {
                match ledger
                    .credit(guild_id, &credit.member_id, credit.amount, &delivery.credit_reason)
                    .await
                {
                    Ok(()) => debug!(
                        member_id = %credit.member_id,
                        amount = credit.amount,
                        "diamonds credited"
                    ),
                    Err(err) => {
                        warn!(
                            member_id = %credit.member_id,
                            playername = %credit.playername,
                            amount = credit.amount,
                            "diamond credit failed: {:#}",
                            err
                        );
                        unpaid.push(credit.clone());
                    }
                }
            }
        }
        None => unpaid.extend(plan.credits.iter().cloned()),
    }

    let mut report = DeliveryReport {
        credited: plan.credits.len() - unpaid.len(),
        credit_failures: if state.reward_ledger.is_some() { unpaid.len() } else { 0 },
        manual_payouts: plan.manual.len() + unpaid.len(),
        item_commands: plan.item_commands.len(),
        admin_log_sent: false,
    };

    let has_work = !plan.item_commands.is_empty() || report.manual_payouts > 0;
    if !has_work {
        return report;
    }
    let Some(channel_id) = delivery.admin_log_channel_id.as_ref() else {
        for command in &plan.item_commands {
            info!(command = %command, "item reward to grant");
        }
        warn!(
            item_commands = report.item_commands,
            manual_payouts = report.manual_payouts,
            "no admin log channel configured, rewards left to relay by hand"
        );
        return report;
    };

    let text = render_admin_log(
        &announcement.results_label,
        &plan,
        &unpaid,
        &state.config.style.diamond_icon,
    );
    report.admin_log_sent = true;
    for chunk in split_message(&text, MESSAGE_CHAR_LIMIT) {
        let message = OutgoingMessage {
            content: chunk,
            mention_everyone: false,
        };
        if let Err(err) = state.chat.send_message(channel_id, &message).await {
            warn!(channel_id = %channel_id, "admin log post failed: {:#}", err);
            report.admin_log_sent = false;
            break;
        }
    }
    report
}
