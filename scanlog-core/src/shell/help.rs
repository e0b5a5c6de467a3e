use crate::filter::FilterKey;
use std::io::{self, Write};

const COMMANDS: &str = "\
Available commands:
  list [filters]                       List matching requests
  info <number|filename>... [filters] [--no-body]
                                       Show request and response details
                                       (--no-body hides the bodies)
  count [filters]                      Count matching requests
  summary [full] [filters]             Group requests by endpoint
                                       (full also splits by method and status)
  params <number|filename>... [filters]
                                       Show request parameters
  load <path>                          Load another archive
  errors                               Show entries that failed to parse
  help                                 Show this help message
  quit, q                              Exit the shell
";

const FILTER_EXAMPLES: &str = "\
Examples:
  method=GET
  status_code=200
  content_type=application/json
  requester=oracle
  size=100-1000
  url=api/users
  operation=login
  coverage=covered
  endpoint=/users
  in_schema=true

Invert any filter with a ! prefix:
  method=!GET          every method except GET
  status_code=!200     every status code except 200
  size=!100-1000       sizes outside the range
";

pub(super) fn render(out: &mut dyn Write) -> io::Result<()> {
    write!(out, "{}", COMMANDS)?;
    writeln!(out)?;
    let keys: Vec<&str> = FilterKey::ALL.iter().map(FilterKey::as_str).collect();
    writeln!(out, "Filters are key=value pairs. Keys: {}", keys.join(", "))?;
    write!(out, "{}", FILTER_EXAMPLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_filter_key() {
        let mut out = Vec::new();
        render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for key in FilterKey::ALL {
            assert!(text.contains(&format!("{}=", key.as_str())), "missing {}", key);
        }
        assert!(text.contains("quit, q"));
    }
}
