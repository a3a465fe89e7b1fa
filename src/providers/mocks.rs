// src/providers/mocks.rs

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::{CodeGenerator, GeneratorError};

/// Scriptable generator for tests: yields queued responses in order, then
/// repeats the last entry. An entry of `None` raises an error for that call.
pub struct MockGenerator {
    pub name: String,
    script: Mutex<Vec<Option<String>>>,
    calls: Mutex<usize>,
}

impl MockGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn with_response(self, code: &str) -> Self {
        self.script.lock().unwrap().push(Some(code.to_string()));
        self
    }

    pub fn with_failure(self) -> Self {
        self.script.lock().unwrap().push(None);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CodeGenerator for MockGenerator {
    fn generator_name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        _system: &str,
        _user: &str,
        _temperature: f64,
        _timeout: Duration,
    ) -> Result<String, GeneratorError> {
        let mut calls = self.calls.lock().unwrap();
        let index = *calls;
        *calls += 1;

        let script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(GeneratorError::InvalidResponse);
        }
        let entry = script.get(index).unwrap_or_else(|| script.last().unwrap());
        match entry {
            Some(code) => Ok(code.clone()),
            None => Err(GeneratorError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_plays_in_order_then_repeats() {
        let generator = MockGenerator::new("test")
            .with_failure()
            .with_response("second");

        assert!(generator
            .generate("s", "u", 0.7, Duration::from_secs(1))
            .await
            .is_err());
        assert_eq!(
            generator
                .generate("s", "u", 0.5, Duration::from_secs(1))
                .await
                .unwrap(),
            "second"
        );
        // Past the end of the script the last entry repeats.
        assert_eq!(
            generator
                .generate("s", "u", 0.3, Duration::from_secs(1))
                .await
                .unwrap(),
            "second"
        );
        assert_eq!(generator.call_count(), 3);
    }
}
