use crate::error::CliError;
use serde::Serialize;

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub async fn emit<T: Serialize>(value: &T, path: Option<&str>) -> Result<(), CliError> {
    let json = to_json(value)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::pagination::page::Page;

    #[tokio::test]
    async fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        let page = Page::new(vec!["a1", "a2"], 0, 2, 5);

        emit(&page, path.to_str()).await.unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["total_elements"], 5);
        assert_eq!(written["total_pages"], 3);
        assert_eq!(written["items"][1], "a2");
    }
}
