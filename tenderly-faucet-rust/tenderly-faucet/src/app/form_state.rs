use crate::validators::fund_validator::FundRequest;
use serde::Serialize;
use tenderly_faucet_core::TimeUnit;

/// Inputs of the fund form as last entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub use_custom_token: bool,
    pub selected_token: String,
    pub custom_token: String,
    pub amount: String,
    pub recipient: String,
    pub loading: bool,
}

impl FormState {
    /// Empty form with `default_token` preselected
    pub fn new(default_token: &str) -> Self {
        Self {
            use_custom_token: false,
            selected_token: default_token.to_string(),
            custom_token: String::new(),
            amount: String::new(),
            recipient: String::new(),
            loading: false,
        }
    }

    pub fn reduce(self, action: FormAction) -> Self {
        match action {
            FormAction::SetUseCustomToken(value) => Self {
                use_custom_token: value,
                ..self
            },
            FormAction::SetSelectedToken(value) => Self {
                selected_token: value,
                ..self
            },
            FormAction::SetCustomToken(value) => Self {
                custom_token: value,
                ..self
            },
            FormAction::SetAmount(value) => Self { amount: value, ..self },
            FormAction::SetRecipient(value) => Self {
                recipient: value,
                ..self
            },
            FormAction::SetLoading(value) => Self { loading: value, ..self },
        }
    }

    /// Apply `actions` in order. Returns the new state and whether any user input changed.
    pub fn reduce_all(self, actions: impl IntoIterator<Item = FormAction>) -> (Self, bool) {
        let before = self.clone();
        let after = actions.into_iter().fold(self, Self::reduce);
        let inputs_changed = FormState {
            loading: before.loading,
            ..after.clone()
        } != before;
        (after, inputs_changed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetUseCustomToken(bool),
    SetSelectedToken(String),
    SetCustomToken(String),
    SetAmount(String),
    SetRecipient(String),
    SetLoading(bool),
}

impl FormAction {
    /// Actions that mirror every field of a submitted request
    pub fn from_request(request: &FundRequest) -> Vec<FormAction> {
        let mut actions = vec![
            FormAction::SetRecipient(request.recipient.trim().to_string()),
            FormAction::SetAmount(request.amount.trim().to_string()),
            FormAction::SetUseCustomToken(request.use_custom_token),
        ];
        if let Some(token) = &request.token {
            actions.push(FormAction::SetSelectedToken(token.trim().to_string()));
        }
        if let Some(custom_token) = &request.custom_token {
            actions.push(FormAction::SetCustomToken(custom_token.trim().to_string()));
        }
        actions
    }
}

/// Inputs of the timestamp form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimestampFormState {
    pub advance_amount: u64,
    pub time_unit: TimeUnit,
    pub loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderly_faucet_core::shared::constants::ETH_ADDRESS;

    #[test]
    fn test_reducer_sets_single_fields() {
        let state = FormState::new(ETH_ADDRESS)
            .reduce(FormAction::SetRecipient("0xabc".to_string()))
            .reduce(FormAction::SetAmount("1.5".to_string()))
            .reduce(FormAction::SetUseCustomToken(true));

        assert_eq!(state.recipient, "0xabc");
        assert_eq!(state.amount, "1.5");
        assert!(state.use_custom_token);
        assert_eq!(state.selected_token, ETH_ADDRESS);
        assert!(!state.loading);
    }

    #[test]
    fn test_loading_is_not_an_input_change() {
        let state = FormState::new(ETH_ADDRESS);
        let (state, changed) = state.reduce_all([FormAction::SetLoading(true)]);
        assert!(state.loading);
        assert!(!changed);

        let (_, changed) = state.reduce_all([FormAction::SetAmount("2".to_string())]);
        assert!(changed);
    }

    #[test]
    fn test_resubmitting_same_values_is_not_a_change() {
        let request = FundRequest {
            recipient: "0xabc".to_string(),
            token: Some(ETH_ADDRESS.to_string()),
            amount: "1".to_string(),
            ..FundRequest::default()
        };
        let (state, changed) = FormState::new(ETH_ADDRESS).reduce_all(FormAction::from_request(&request));
        assert!(changed);

        let (_, changed) = state.reduce_all(FormAction::from_request(&request));
        assert!(!changed);
    }
}
