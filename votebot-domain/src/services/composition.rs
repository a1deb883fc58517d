use crate::entities::{
    AliasTable, Announcement, ParticipantEntry, RankedPlayer, RewardTable, RewardTier,
    StyleConfig, WinnerEntry, MESSAGE_CHAR_LIMIT,
};
use crate::services::MemberIndex;
use crate::value_objects::{Period, Resolution};

pub struct AnnouncementInput<'a> {
    pub period: Period,
    pub ranking: &'a [RankedPlayer],
    pub index: &'a MemberIndex,
    pub aliases: &'a AliasTable,
    pub rewards: &'a RewardTable,
    pub style: &'a StyleConfig,
    pub diamonds_per_vote: u64,
    /// Diamonds are paid out by the economy ledger after posting; the credit
    /// line is only rendered when that is true.
    pub credits_enabled: bool,
}

/// Resolves the ranking against the member index and lays out the message.
///
/// The first N voters (N = reward tiers) win their tier, everyone after them
/// with at least one vote is listed for participation diamonds. Players with
/// zero votes are never rewarded.
pub fn compose_announcement(input: AnnouncementInput<'_>) -> Announcement {
    let voters = input.ranking.iter().filter(|player| player.votes > 0);
    let mut winners = Vec::new();
    let mut participants = Vec::new();

    for (position, player) in voters.enumerate() {
        let rank = position as u32 + 1;
        let resolution = input.index.resolve(&player.playername, input.aliases);
        match input.rewards.for_rank(rank) {
            Some(reward) => winners.push(WinnerEntry {
                rank,
                player: player.clone(),
                resolution,
                reward: reward.clone(),
            }),
            None => participants.push(ParticipantEntry {
                rank,
                player: player.clone(),
                resolution,
                diamonds: player.votes.saturating_mul(input.diamonds_per_vote),
            }),
        }
    }

    let results_period = input.period.previous();
    let results_label = format!("{} {}", results_period.month_name_fr(), results_period.year());
    let mut announcement = Announcement {
        period: input.period,
        results_period,
        results_label,
        winners,
        participants,
        mention_everyone: input.style.everyone_ping,
        chunks: Vec::new(),
    };
    let text = render_announcement(
        &announcement,
        input.style,
        input.diamonds_per_vote,
        input.credits_enabled,
    );
    announcement.chunks = split_message(&text, MESSAGE_CHAR_LIMIT);
    announcement
}

pub fn render_announcement(
    announcement: &Announcement,
    style: &StyleConfig,
    diamonds_per_vote: u64,
    credits_enabled: bool,
) -> String {
    let mut lines = Vec::new();
    if announcement.mention_everyone {
        lines.push("@everyone".to_string());
    }
    lines.push(format!(
        "{logo} **{title} {label}** {logo}",
        logo = style.logo,
        title = style.title,
        label = announcement.results_label
    ));
    lines.push(String::new());
    lines.push(style.intro_text.clone());
    lines.push(String::new());

    if announcement.winners.is_empty() {
        lines.push("Aucun vote enregistré ce mois-ci.".to_string());
    }
    for entry in &announcement.winners {
        lines.push(format!(
            "{icon} {who} **{votes} votes** {arrow} {reward}",
            icon = style.place_icon(entry.rank),
            who = display_player(&entry.player, &entry.resolution, style),
            votes = entry.player.votes,
            arrow = style.arrow,
            reward = describe_reward(&entry.reward, style),
        ));
    }

    if !announcement.participants.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{sparkly} **{title}** : {per_vote} {diamond} par vote",
            sparkly = style.sparkly,
            title = style.participation_title,
            per_vote = diamonds_per_vote,
            diamond = style.diamond_icon,
        ));
        for entry in &announcement.participants {
            lines.push(format!(
                "{who} : {votes} votes {arrow} {diamonds} {diamond}",
                who = display_player(&entry.player, &entry.resolution, style),
                votes = entry.player.votes,
                arrow = style.arrow,
                diamonds = entry.diamonds,
                diamond = style.diamond_icon,
            ));
        }
    }

    if credits_enabled {
        lines.push(String::new());
        lines.push(format!("{} {}", style.fireworks, style.credit_text));
    }
    if let Some(url) = style.memo_url.as_deref().filter(|url| !url.trim().is_empty()) {
        lines.push(format!("{} {} {}", style.memo_text, style.arrow, url));
    }
    lines.join("\n")
}

pub fn describe_reward(reward: &RewardTier, style: &StyleConfig) -> String {
    let mut parts = reward
        .items
        .iter()
        .map(|item| format!("{} x{}", item.item, item.quantity))
        .collect::<Vec<_>>();
    if let Some(amount) = reward.diamonds.filter(|amount| *amount > 0) {
        parts.push(format!("{} {}", amount, style.diamond_icon));
    }
    let joined = parts.join(", ");
    match reward.label.as_deref().filter(|label| !label.trim().is_empty()) {
        Some(label) => format!("{} : {}", label, joined),
        None => joined,
    }
}

fn display_player(player: &RankedPlayer, resolution: &Resolution, style: &StyleConfig) -> String {
    match resolution.member_id() {
        Some(member_id) => member_id.mention(),
        None => format!(
            "{} {}",
            escape_markdown(&player.playername),
            style.not_linked_marker
        ),
    }
}

fn escape_markdown(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '*' | '_' | '~' | '`' | '|' | '>' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Splits `text` into chunks of at most `limit` characters, preferring line
/// boundaries and hard-splitting only lines that are longer than the limit.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { current_len + 1 + line_len };
        if needed <= limit {
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(line);
            current_len += line_len;
            continue;
        }
        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
            continue;
        }
        let chars = line.chars().collect::<Vec<_>>();
        let mut pieces = chars.chunks(limit).peekable();
        while let Some(piece) = pieces.next() {
            let piece = piece.iter().collect::<String>();
            if pieces.peek().is_some() {
                chunks.push(piece);
            } else {
                current_len = piece.chars().count();
                current = piece;
            }
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}
