/// State of one request-backed value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    /// The request failed; holds the user-facing message.
    Failed(String),
}

impl<T> Loadable<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Start a request. A value already present stays visible until the reply lands.
    pub fn begin(&mut self) {
        if !matches!(self, Self::Ready(_)) {
            *self = Self::Loading;
        }
    }
}

impl<T: Default> Loadable<T> {
    /// The ready value, or an empty one for every other state.
    #[must_use]
    pub fn value_or_default(&self) -> T
    where
        T: Clone,
    {
        self.ready().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_keeps_ready_values() {
        let mut slot = Loadable::Ready(3);
        slot.begin();
        assert_eq!(slot.ready(), Some(&3));

        let mut slot: Loadable<u8> = Loadable::Failed("offline".into());
        slot.begin();
        assert!(slot.is_loading());
        assert_eq!(slot.error(), None);
    }

    #[test]
    fn failed_slots_read_as_empty() {
        let slot: Loadable<Vec<u8>> = Loadable::Failed("offline".into());
        assert!(slot.value_or_default().is_empty());
        assert_eq!(slot.error(), Some("offline"));
    }
}
