use crate::catalog::ProductId;
use crate::error::TranslationError;
use std::fmt;

/// `pid:offset:offset...`, one offset per dimension of the product's tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    pub pid: ProductId,
    pub offsets: Vec<usize>,
}

impl CompositeKey {
    pub fn new(pid: ProductId, offsets: Vec<usize>) -> Self {
        Self { pid, offsets }
    }

    pub fn parse(key: &str) -> Result<Self, TranslationError> {
        let malformed = |reason: String| TranslationError::MalformedKey {
            key: key.to_string(),
            reason,
        };

        let mut fields = key.split(':');
        let pid = match fields.next() {
            Some(raw) if !raw.is_empty() => raw
                .parse::<u32>()
                .map_err(|err| malformed(format!("product id \"{raw}\": {err}")))?,
            _ => return Err(malformed("empty key".to_string())),
        };

        let offsets = fields
            .enumerate()
            .map(|(idx, raw)| {
                raw.parse::<usize>()
                    .map_err(|err| malformed(format!("field {} \"{raw}\": {err}", idx + 1)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            pid: ProductId(pid),
            offsets,
        })
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pid)?;
        for offset in &self.offsets {
            write!(f, ":{offset}")?;
        }
        Ok(())
    }
}
