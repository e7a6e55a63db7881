//! Parsers for `rdmsr` and `wrmsr`.

use hvdbg_protocol::{CoreSelector, MsrAction, MsrRequest};

use super::repeated;
use crate::command::Command;
use crate::error::{CommandError, HvdbgResult};
use crate::numeric::{parse_address, parse_hex_u32};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expecting
{
    Value,
    CoreId,
}

#[derive(Debug, Default)]
struct Fields
{
    msr: Option<u32>,
    value: Option<u64>,
    core: Option<CoreSelector>,
}

/// Parse `rdmsr <msr> [core <id>]`
///
/// ## Errors
///
/// `Syntax` for a missing or repeated MSR, a repeated or dangling `core`,
/// or too many tokens; `Validation` for tokens that are not hex.
pub fn parse_rdmsr(command: &Command) -> HvdbgResult<MsrRequest>
{
    let fields = parse_fields(command, MsrAction::Read)?;
    let msr = fields
        .msr
        .ok_or_else(|| CommandError::Syntax("please specify a correct hex value to be read".to_string()))?;

    Ok(MsrRequest::read(msr, fields.core.unwrap_or_default()))
}

/// Parse `wrmsr <msr> <value> [core <id>]`
///
/// ## Errors
///
/// `Syntax` for a missing MSR or value, a third positional value, a
/// repeated or dangling `core`, or too many tokens; `Validation` for tokens
/// that are not hex.
pub fn parse_wrmsr(command: &Command) -> HvdbgResult<MsrRequest>
{
    let fields = parse_fields(command, MsrAction::Write)?;
    let msr = fields
        .msr
        .ok_or_else(|| CommandError::Syntax("please specify a correct hex value to write".to_string()))?;
    let value = fields
        .value
        .ok_or_else(|| CommandError::Syntax("please specify a correct hex value to put on msr".to_string()))?;

    Ok(MsrRequest::write(msr, value, fields.core.unwrap_or_default()))
}

fn parse_fields(command: &Command, action: MsrAction) -> HvdbgResult<Fields>
{
    let name = command.name();
    // msr, optional value, and `core <id>`
    let max_args = match action {
        MsrAction::Read => 3,
        MsrAction::Write => 4,
    };
    if command.args().len() > max_args {
        return Err(CommandError::Syntax(format!("incorrect use of '{name}'")));
    }

    let (state, fields) = command.args().iter().try_fold(
        (Expecting::Value, Fields::default()),
        |(state, mut fields), token| -> HvdbgResult<(Expecting, Fields)> {
            if state == Expecting::CoreId {
                let core = parse_hex_u32(token).ok_or_else(|| {
                    CommandError::Validation("please specify a correct hex value for core id".to_string())
                })?;
                fields.core = Some(CoreSelector::from(core));
                return Ok((Expecting::Value, fields));
            }

            if token == "core" {
                if fields.core.is_some() {
                    return Err(repeated("core", name));
                }
                return Ok((Expecting::CoreId, fields));
            }

            match (action, fields.msr, fields.value) {
                (_, None, _) => {
                    let msr = parse_hex_u32(token).ok_or_else(|| {
                        CommandError::Validation("please specify a correct hex value to be read".to_string())
                    })?;
                    fields.msr = Some(msr);
                }
                (MsrAction::Write, Some(_), None) => {
                    let value = parse_address(token).ok_or_else(|| {
                        CommandError::Validation("please specify a correct hex value to put on the msr".to_string())
                    })?;
                    fields.value = Some(value);
                }
                (MsrAction::Read, Some(_), _) => return Err(repeated("msr", name)),
                (MsrAction::Write, Some(_), Some(_)) => return Err(repeated("value", name)),
            }
            Ok((Expecting::Value, fields))
        },
    )?;

    if state == Expecting::CoreId {
        return Err(CommandError::Syntax("please specify a correct hex value for core".to_string()));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn rdmsr(line: &str) -> HvdbgResult<MsrRequest>
    {
        parse_rdmsr(&Command::parse(line).unwrap())
    }

    fn wrmsr(line: &str) -> HvdbgResult<MsrRequest>
    {
        parse_wrmsr(&Command::parse(line).unwrap())
    }

    #[test]
    fn test_rdmsr_defaults_to_all_cores()
    {
        let request = rdmsr("rdmsr c0000082").unwrap();
        assert_eq!(request, MsrRequest::read(0xc000_0082, CoreSelector::All));
        assert_eq!(request.core.raw(), 0xffff_ffff);
    }

    #[test]
    fn test_rdmsr_with_core()
    {
        assert_eq!(
            rdmsr("rdmsr core 2 c0000082").unwrap(),
            MsrRequest::read(0xc000_0082, CoreSelector::Core(2))
        );
    }

    #[test]
    fn test_rdmsr_errors()
    {
        assert!(matches!(rdmsr("rdmsr"), Err(CommandError::Syntax(_))));
        assert!(matches!(rdmsr("rdmsr c0000082 core"), Err(CommandError::Syntax(_))));
        assert!(matches!(rdmsr("rdmsr c0000082 c0000080"), Err(CommandError::Syntax(_))));
        assert!(matches!(rdmsr("rdmsr c0000082 core 1 core 2"), Err(CommandError::Syntax(_))));
        assert!(matches!(rdmsr("rdmsr xyz"), Err(CommandError::Validation(_))));
        assert!(matches!(rdmsr("rdmsr c0000082 core 1x"), Err(CommandError::Validation(_))));
        assert!(matches!(rdmsr("rdmsr 1c0000082"), Err(CommandError::Validation(_))));
    }

    #[test]
    fn test_wrmsr_parses_value_and_core()
    {
        assert_eq!(
            wrmsr("wrmsr c0000082 fffff8077356f010 core 2").unwrap(),
            MsrRequest::write(0xc000_0082, 0xfffff807_7356f010, CoreSelector::Core(2))
        );
        assert_eq!(
            wrmsr("wrmsr c0000082 fffff807`7356f010").unwrap(),
            MsrRequest::write(0xc000_0082, 0xfffff807_7356f010, CoreSelector::All)
        );
    }

    #[test]
    fn test_wrmsr_requires_value()
    {
        assert!(matches!(wrmsr("wrmsr c0000082"), Err(CommandError::Syntax(_))));
        assert!(matches!(wrmsr("wrmsr c0000082 core 1"), Err(CommandError::Syntax(_))));
    }

    #[test]
    fn test_wrmsr_rejects_third_value()
    {
        assert!(matches!(wrmsr("wrmsr c0000082 1 2"), Err(CommandError::Syntax(_))));
    }
}
