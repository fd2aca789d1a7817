use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info};

use crate::models::{LabelVariant, MatchTier, Person, Roster, SpeechRecord};

/// Summary of a single matching pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub tier: MatchTier,
    /// Components matched by this pass
    pub matched: usize,
    /// Components still unresolved after this pass
    pub remaining: usize,
}

/// Result of Stage 1 name resolution
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    /// component id -> person id
    pub resolved: BTreeMap<String, String>,
    /// Speech records no tier could attribute
    pub unresolved: BTreeMap<String, SpeechRecord>,
    /// One entry per pass, in execution order
    pub passes: Vec<PassSummary>,
    /// Title+surname labels shared by more than one person
    pub duplicate_surnames: BTreeSet<String>,
}

/// Output of one pass over the unresolved set
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    pub matched: BTreeMap<String, String>,
    pub remaining: BTreeMap<String, SpeechRecord>,
}

/// Label variants for the whole roster, grouped by tier in roster order
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    title_surname: Vec<LabelVariant>,
    title_initial_surname: Vec<LabelVariant>,
    compound_surname: Vec<LabelVariant>,
    duplicate_surnames: BTreeSet<String>,
}

impl LabelIndex {
    /// Derive every person's variants
    ///
    /// Title+surname labels produced by more than one person are withheld
    /// from the first tier entirely.
    pub fn build(roster: &Roster) -> Self {
        let mut index = LabelIndex::default();
        let mut surname_counts: HashMap<String, usize> = HashMap::new();
        let mut title_surname = Vec::new();

        for person in roster.people() {
            for variant in derive_variants(person) {
                match variant.tier {
                    MatchTier::TitleSurname => {
                        *surname_counts.entry(variant.label.clone()).or_default() += 1;
                        title_surname.push(variant);
                    }
                    MatchTier::TitleInitialSurname => index.title_initial_surname.push(variant),
                    MatchTier::CompoundSurname => index.compound_surname.push(variant),
                }
            }
        }

        index.duplicate_surnames = surname_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(label, _)| label)
            .collect();
        index.title_surname = title_surname
            .into_iter()
            .filter(|v| !index.duplicate_surnames.contains(&v.label))
            .collect();

        index
    }

    pub fn variants(&self, tier: MatchTier) -> &[LabelVariant] {
        match tier {
            MatchTier::TitleSurname => &self.title_surname,
            MatchTier::TitleInitialSurname => &self.title_initial_surname,
            MatchTier::CompoundSurname => &self.compound_surname,
        }
    }

    pub fn duplicate_surnames(&self) -> &BTreeSet<String> {
        &self.duplicate_surnames
    }
}

/// Derive the label variants for one person
///
/// - title surname: first and last token
/// - title initial surname: needs a given name between title and surname
/// - compound surname: last two tokens, only for names of more than three tokens
pub fn derive_variants(person: &Person) -> Vec<LabelVariant> {
    let tokens = person.name_tokens();
    let mut variants = Vec::new();

    let (Some(title), Some(surname)) = (tokens.first(), tokens.last()) else {
        return variants;
    };
    if tokens.len() < 2 {
        return variants;
    }

    let make = |tier, label: String| LabelVariant {
        tier,
        label,
        person_id: person.person_id.clone(),
    };

    variants.push(make(
        MatchTier::TitleSurname,
        format!("{} {}", title, surname),
    ));

    if tokens.len() >= 3 {
        if let Some(initial) = tokens[1].chars().next() {
            variants.push(make(
                MatchTier::TitleInitialSurname,
                format!("{} {} {}", title, initial, surname),
            ));
        }
    }

    if tokens.len() > 3 {
        variants.push(make(
            MatchTier::CompoundSurname,
            format!("{} {} {}", title, tokens[tokens.len() - 2], surname),
        ));
    }

    variants
}

/// Match unresolved records against one tier's labels by exact equality
///
/// When a label belongs to several people the earliest in `variants` wins.
pub fn run_pass(unresolved: BTreeMap<String, SpeechRecord>, variants: &[LabelVariant]) -> PassOutcome {
    let mut lookup: HashMap<&str, &str> = HashMap::new();
    for variant in variants {
        lookup
            .entry(variant.label.as_str())
            .or_insert(variant.person_id.as_str());
    }

    let mut outcome = PassOutcome::default();
    for (component_id, record) in unresolved {
        match lookup.get(record.speaker_label.as_str()) {
            Some(person_id) => {
                debug!(
                    "{} ({}) -> person {}",
                    component_id, record.speaker_label, person_id
                );
                outcome.matched.insert(component_id, person_id.to_string());
            }
            None => {
                outcome.remaining.insert(component_id, record);
            }
        }
    }
    outcome
}

/// Execute Stage 1: resolve speaker labels against the roster
///
/// Passes run strictly in [`MatchTier::ORDER`]; each only sees what the
/// previous pass left unresolved. Anything left after the last pass stays
/// unresolved.
pub fn resolve(speech_records: &BTreeMap<String, SpeechRecord>, roster: &Roster) -> ResolutionResult {
    let index = LabelIndex::build(roster);
    if !index.duplicate_surnames().is_empty() {
        debug!(
            "Withholding shared labels from first tier: {:?}",
            index.duplicate_surnames()
        );
    }

    let mut resolved = BTreeMap::new();
    let mut unresolved = speech_records.clone();
    let mut passes = Vec::with_capacity(MatchTier::ORDER.len());

    for tier in MatchTier::ORDER {
        let outcome = run_pass(unresolved, index.variants(tier));
        let summary = PassSummary {
            tier,
            matched: outcome.matched.len(),
            remaining: outcome.remaining.len(),
        };
        info!(
            "Stage 1: {} pass matched {}, {} remaining",
            tier, summary.matched, summary.remaining
        );
        passes.push(summary);
        resolved.extend(outcome.matched);
        unresolved = outcome.remaining;
    }

    info!(
        "Stage 1: {} resolved, {} unresolved",
        resolved.len(),
        unresolved.len()
    );

    ResolutionResult {
        resolved,
        unresolved,
        passes,
        duplicate_surnames: index.duplicate_surnames,
    }
}
