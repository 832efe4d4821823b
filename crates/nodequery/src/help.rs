//! The text printed by `help`.

/// The command reference shown by `help`.
pub const HELP_TEXT: &str = "\
Available commands:

  match PATTERN, m PATTERN          Match the tree against PATTERN and emit the
                                    Diagnostic message once per match.
  match @NAME, m @NAME              Match the pattern value bound to NAME.
  let NAME \"STRING\", l ...          Bind NAME to a string value.
  let NAME PATTERN                  Bind NAME to a compiled pattern.
  let NAME @OTHER                   Bind NAME to a copy of the value of OTHER.
  let NAME, unlet NAME              Remove the value bound to NAME.
  set bind-root (true|false)        Bind the node matched by each pattern root
                                    as 'root'.
  set print-matcher (true|false)    Record whether matchers should be printed.
  set traversal KIND                Set the traversal kind, one of AsIs or
                                    IgnoreUnlessSpelledInSource.
  set output FEATURE                Enable only FEATURE for bound nodes.
  enable output FEATURE             Enable FEATURE in addition to the others.
  disable output FEATURE            Disable FEATURE.
  help                              Print this message.
  quit, q                           Stop running scripts.
  # TEXT                            Ignore the rest of the line.

Output features are diag, print, detailed-ast (or dump) and srcloc.
Matches are reported through the string value Diagnostic; %0, %1, ... in the
message are replaced by the bound nodes named in DiagnosticArgs, which
defaults to 'root'.
";
