use std::path::Path;

use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt, BufReader},
};

/// Read the inputs of a batch prediction file, one trimmed text per line
///
/// Blank lines are kept as empty inputs so line indices match the file.
pub async fn read_inputs<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let mut lines = BufReader::new(File::open(path).await?).lines();
    let mut inputs = Vec::new();

    while let Some(line) = lines.next_line().await? {
        inputs.push(line.trim().to_string());
    }

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_read_inputs_trims_and_keeps_blank_lines() {
        let path = std::env::temp_dir().join(format!(
            "burn-pipelines-api-inputs-{}.txt",
            std::process::id()
        ));
        tokio::fs::write(&path, "  Lisbon is a pretty city.\r\n\nAntónio Nunes!\t\n")
            .await
            .unwrap();

        let inputs = read_inputs(&path).await.unwrap();

        assert_eq!(
            inputs,
            vec!["Lisbon is a pretty city.", "", "António Nunes!"]
        );
    }

    #[tokio::test]
    async fn test_missing_file() {
        assert!(read_inputs("does/not/exist.txt").await.is_err());
    }
}
