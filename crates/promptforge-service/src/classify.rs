use promptforge_core::EnhanceError;

use crate::ProviderError;

/// Map a provider failure onto the user-facing error taxonomy.
///
/// Key problems win over everything else, then safety blocks, then quota.
pub fn classify(err: &ProviderError) -> EnhanceError {
    let text = err.to_string();
    let lower = text.to_lowercase();

    let (status, code, reason) = match err {
        ProviderError::Http {
            status,
            code,
            reason,
            ..
        } => (Some(*status), code.as_deref(), reason.as_deref()),
        _ => (None, None, None),
    };

    let mentions_key = |s: &str| s.contains("API_KEY");
    if mentions_key(&text) || code.is_some_and(mentions_key) || reason.is_some_and(mentions_key) {
        return EnhanceError::RejectedCredential(provider_message(err));
    }

    if matches!(err, ProviderError::Blocked { .. }) || lower.contains("candidate was blocked") {
        return EnhanceError::ContentBlocked;
    }

    if status == Some(429) || code == Some("RESOURCE_EXHAUSTED") || lower.contains("quota") {
        return EnhanceError::QuotaExceeded;
    }

    EnhanceError::Service(provider_message(err))
}

/// The most useful human-readable part of a provider error.
fn provider_message(err: &ProviderError) -> String {
    match err {
        ProviderError::Http { message, .. } if !message.is_empty() => message.clone(),
        ProviderError::Http { status, .. } => format!("HTTP {status}"),
        other => other.to_string(),
    }
}
