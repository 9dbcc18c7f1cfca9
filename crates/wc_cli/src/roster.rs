//! Roster CSV loading
//!
//! One row per team or slot, no header:
//!
//! ```text
//! name,confederation,pot,host,fixed_group,flag,candidates,fifa_ranking,uefa_group_winner
//! ```
//!
//! Only the first four columns are required. Lines starting with `#` are
//! comments. Placeholders list their confederations pipe-joined
//! (`CAF|CONCACAF|OFC`) and their candidates semicolon-joined.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use wc_core::models::parse_group;
use wc_core::{assign_pots, ConfederationSet, DrawConfig, Pots, RosterError, Slot, Team};

/// Roster shipped with the crate.
pub const DEFAULT_ROSTER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/teams.csv");

/// One parsed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub team: Team,
    pub candidates: Option<Vec<String>>,
}

/// Parsed roster, rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    /// Teams grouped by the pot column.
    pub fn pots(&self) -> Pots {
        Pots::from_teams(self.entries.iter().map(|e| e.team.clone()))
    }

    /// Pots ready for a draw: re-seeded by ranking when playoffs are seeded,
    /// then checked for the 4 x 12 shape.
    pub fn draw_pots(&self, config: &DrawConfig) -> Result<Pots> {
        let pots = self.pots();
        let pots = if config.uefa_playoffs_seeded {
            assign_pots(&pots, config)
        } else {
            pots
        };
        pots.validate().context("Roster is not drawable")?;
        Ok(pots)
    }

    /// Playoff and path entries.
    pub fn slots(&self) -> Vec<Slot> {
        self.entries
            .iter()
            .filter_map(|e| Slot::from_team(&e.team, e.candidates.clone()))
            .collect()
    }
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open roster file: {}", path.display()))?;
    let roster =
        parse_roster(file).with_context(|| format!("Failed to parse roster: {}", path.display()))?;
    debug!(path = %path.display(), teams = roster.entries.len(), "roster loaded");
    Ok(roster)
}

pub fn parse_roster<R: Read>(reader: R) -> Result<Roster> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut roster = Roster::default();
    for result in reader.records() {
        let record = result.context("Failed to read roster row")?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let entry = parse_row(&record).with_context(|| format!("Invalid roster row at line {}", line))?;
        roster.entries.push(entry);
    }
    Ok(roster)
}

fn parse_row(record: &csv::StringRecord) -> Result<RosterEntry> {
    if record.len() < 4 {
        bail!("expected at least 4 columns, found {}", record.len());
    }
    let field = |i: usize| record.get(i).unwrap_or("");

    let name = field(0).trim_start_matches('\u{feff}').to_string();
    if name.is_empty() {
        bail!("missing team name");
    }

    let confederation_field = field(1);
    if confederation_field.is_empty() {
        return Err(RosterError::EmptyConfederation { team: name }.into());
    }
    let confederation: ConfederationSet = confederation_field.parse()?;

    let pot: u8 = field(2)
        .parse()
        .with_context(|| format!("Invalid pot '{}' for {}", field(2), name))?;
    if !(1..=4).contains(&pot) {
        return Err(RosterError::InvalidPot { team: name, pot }.into());
    }

    let mut team = Team::new(name, confederation, pot);
    team.host = parse_bool(field(3));
    if !field(4).is_empty() {
        team.fixed_group = Some(parse_group(field(4))?);
    }
    if !field(5).is_empty() {
        team.flag = Some(unescape_flag(field(5)));
    }
    if !field(7).is_empty() {
        team.fifa_ranking = field(7)
            .parse()
            .with_context(|| format!("Invalid FIFA ranking '{}' for {}", field(7), team.name))?;
    }
    team.uefa_group_winner = parse_bool(field(8));

    let candidates = Some(field(6))
        .filter(|c| !c.is_empty())
        .map(|c| {
            c.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });

    Ok(RosterEntry { team, candidates })
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "1")
}

/// Decode `\uXXXX` and `\UXXXXXXXX` escapes so flag glyphs can be written
/// in ASCII. Anything that does not decode is kept as written.
pub fn unescape_flag(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let width = match chars.peek() {
            Some('U') => 8,
            Some('u') => 4,
            _ => {
                out.push(c);
                continue;
            }
        };
        let digits: String = chars.clone().skip(1).take(width).collect();
        let decoded = if digits.len() == width {
            u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(glyph) => {
                out.push(glyph);
                for _ in 0..=width {
                    chars.next();
                }
            }
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wc_core::Confederation;

    fn parse(text: &str) -> Result<Roster> {
        parse_roster(text.as_bytes())
    }

    #[test]
    fn test_parse_host_and_non_host() -> Result<()> {
        let roster = parse(
            "# name, confederation, pot, host, fixed_group\n\
             Argentina,CONMEBOL,1,false,\n\
             Mexico,CONCACAF,1,true,A\n\
             Japan,AFC,2,false,\n",
        )?;
        assert_eq!(roster.entries.len(), 3);

        let argentina = &roster.entries[0].team;
        assert_eq!(argentina.name, "Argentina");
        assert_eq!(argentina.confederation.fixed(), Some(Confederation::Conmebol));
        assert!(!argentina.host);
        assert_eq!(argentina.fixed_group, None);

        let mexico = &roster.entries[1].team;
        assert!(mexico.host);
        assert_eq!(mexico.fixed_group, Some('A'));

        let pots = roster.pots();
        assert_eq!(pots.pot(1).len(), 2);
        assert_eq!(pots.pot(2).len(), 1);
        Ok(())
    }

    #[test]
    fn test_optional_columns() -> Result<()> {
        let roster = parse(
            "Spain,UEFA,1,false,,,,1,true\n\
             Intercontinental Playoff 1,CAF|CONCACAF|OFC,4,false,,,DR Congo; Jamaica ;New Caledonia\n",
        )?;
        let spain = &roster.entries[0].team;
        assert_eq!(spain.fifa_ranking, 1);
        assert!(spain.uefa_group_winner);

        let playoff = &roster.entries[1];
        assert!(playoff.team.confederation.is_placeholder());
        assert_eq!(
            playoff.candidates.as_deref(),
            Some(&["DR Congo".to_string(), "Jamaica".into(), "New Caledonia".into()][..])
        );

        let slots = roster.slots();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].allowed_confederations.len(), 3);
        Ok(())
    }

    #[test]
    fn test_escaped_flags_decode() -> Result<()> {
        let roster = parse(
            r"UEFA Playoff X,UEFA,4,false,,\U0001F3F4\U000E0067\U000E0062\U000E0065\U000E006E\U000E0067\U000E007F/é,Wales;Italy",
        )?;
        let expected = "\u{1F3F4}\u{E0067}\u{E0062}\u{E0065}\u{E006E}\u{E0067}\u{E007F}/\u{e9}";
        assert_eq!(roster.entries[0].team.flag.as_deref(), Some(expected));
        assert_eq!(roster.slots()[0].flags.as_deref(), Some(expected));
        Ok(())
    }

    #[test]
    fn test_unescape_keeps_broken_escapes() {
        assert_eq!(unescape_flag(r"\u12"), r"\u12");
        assert_eq!(unescape_flag(r"a\nb"), r"a\nb");
        assert_eq!(unescape_flag(r"\uD800"), r"\uD800");
    }

    #[test]
    fn test_bad_rows_rejected() {
        assert!(parse("Nowhere,XYZ,1,false\n").is_err());
        assert!(parse("Nowhere,,1,false\n").is_err());
        assert!(parse("Nowhere,UEFA,5,false\n").is_err());
        assert!(parse("Nowhere,UEFA,one,false\n").is_err());
        assert!(parse("Nowhere,UEFA,1,true,Q\n").is_err());
        assert!(parse("Nowhere,UEFA\n").is_err());
    }

    #[test]
    fn test_shipped_roster_is_drawable() -> Result<()> {
        let roster = load_roster(Path::new(DEFAULT_ROSTER))?;
        let pots = roster.draw_pots(&DrawConfig::default())?;
        assert_eq!(pots.len(), 48);
        assert_eq!(pots.find("Mexico").and_then(|t| t.fixed_group), Some('A'));
        assert!(roster.slots().len() >= 6);

        let seeded = DrawConfig {
            uefa_playoffs_seeded: true,
            ..DrawConfig::default()
        };
        let seeded_pots = roster.draw_pots(&seeded)?;
        assert_eq!(seeded_pots.len(), 48);
        assert_eq!(seeded_pots.find("UEFA Playoff A").map(|t| t.pot), Some(2));
        assert!(seeded_pots
            .pot(4)
            .iter()
            .all(|t| !t.name.starts_with("UEFA Playoff")));
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Ghana,CAF,4,false,,,,72")?;
        let roster = load_roster(file.path())?;
        assert_eq!(roster.entries[0].team.fifa_ranking, 72);
        assert!(roster.draw_pots(&DrawConfig::default()).is_err());
        Ok(())
    }
}
