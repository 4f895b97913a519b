use crate::models::{Measurement, Parameter, Verdict};
use crate::quality::thresholds::{PH_RANGE, safe_range};
use serde::Serialize;

/// Verdict together with the parameters that produced it.
///
/// - `flagged` is `[Ph]` when the pH gate fired
/// - otherwise it lists every parameter above its upper bound, in
///   `Parameter::ALL` order
/// - it is empty for `SafeForDrinking`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Assessment {
    pub verdict: Verdict,
    pub flagged: Vec<Parameter>,
}

/// Classify a measurement against the built-in threshold table.
///
/// Two stages, in this order:
/// 1. pH outside `[6.5, 8.5]` yields `NeedsFiltration`, whatever the other
///    readings are.
/// 2. Any other parameter strictly above its upper bound yields
///    `UnsafeContaminated`. Lower bounds are not checked here.
///
/// Everything else is `SafeForDrinking`. Total over finite inputs.
pub fn classify(m: &Measurement) -> Verdict {
    if !PH_RANGE.contains(m.ph) {
        return Verdict::NeedsFiltration;
    }
    if contaminants(m).next().is_some() {
        return Verdict::UnsafeContaminated;
    }
    Verdict::SafeForDrinking
}

/// Classify and report which parameters were responsible.
///
/// The verdict is always identical to `classify(m)`.
pub fn assess(m: &Measurement) -> Assessment {
    let verdict = classify(m);
    let flagged = match verdict {
        Verdict::NeedsFiltration => vec![Parameter::Ph],
        Verdict::UnsafeContaminated => contaminants(m).collect(),
        Verdict::SafeForDrinking => Vec::new(),
    };
    Assessment { verdict, flagged }
}

// Non-pH parameters above their upper bound.
fn contaminants(m: &Measurement) -> impl Iterator<Item = Parameter> + '_ {
    Parameter::ALL
        .into_iter()
        .filter(|p| *p != Parameter::Ph)
        .filter(move |p| safe_range(*p).exceeds(m.value(*p)))
}
