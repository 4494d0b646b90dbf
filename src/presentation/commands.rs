// Interactive commands read from stdin by the monitor
use thiserror::Error;

pub const HELP: &str = "\
Comandos:
  p                 pausar/iniciar tempo real
  r                 atualizar agora
  i <segundos>      mudar intervalo (10, 30, 60, 300, 600)
  f <chave> <valor> definir filtro (fromDate, toDate, radiusKm, centerLat, centerLng)
  f <chave>         limpar filtro
  ?                 ajuda
  q                 sair";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleRealtime,
    Refresh,
    SetInterval(u64),
    SetFilter { key: String, value: String },
    ClearFilter(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("comando desconhecido: {0}")]
    Unknown(String),

    #[error("intervalo inválido: {0}")]
    InvalidInterval(String),

    #[error("uso: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };

    let command = match head {
        "p" | "pause" | "play" => Command::ToggleRealtime,
        "r" | "refresh" => Command::Refresh,
        "i" | "interval" => {
            let raw = parts.next().ok_or(CommandError::Usage("i <segundos>"))?;
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| CommandError::InvalidInterval(raw.to_string()))?;
            Command::SetInterval(secs)
        }
        "f" | "filter" => {
            let key = parts
                .next()
                .ok_or(CommandError::Usage("f <chave> [valor]"))?
                .to_string();
            // Values may contain spaces
            let value = parts.collect::<Vec<_>>().join(" ");
            if value.is_empty() {
                Command::ClearFilter(key)
            } else {
                Command::SetFilter { key, value }
            }
        }
        "?" | "h" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("p"), Ok(Some(Command::ToggleRealtime)));
        assert_eq!(parse_command("  r  "), Ok(Some(Command::Refresh)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn test_interval() {
        assert_eq!(parse_command("i 60"), Ok(Some(Command::SetInterval(60))));
        assert_eq!(
            parse_command("i 0"),
            Err(CommandError::InvalidInterval("0".to_string()))
        );
        assert_eq!(
            parse_command("i soon"),
            Err(CommandError::InvalidInterval("soon".to_string()))
        );
        assert_eq!(parse_command("i"), Err(CommandError::Usage("i <segundos>")));
    }

    #[test]
    fn test_filters() {
        assert_eq!(
            parse_command("f centerLat -23.55"),
            Ok(Some(Command::SetFilter {
                key: "centerLat".to_string(),
                value: "-23.55".to_string()
            }))
        );
        assert_eq!(
            parse_command("f radiusKm"),
            Ok(Some(Command::ClearFilter("radiusKm".to_string())))
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            parse_command("zoom 3"),
            Err(CommandError::Unknown("zoom".to_string()))
        );
    }
}
