//! Method resolution and reply decoding for the read/write dispatch
//! paths.

use hawser_abi::{decode_revert, Abi, AbiError, Function, Value};

use crate::{ContractError, ContractResult};

/// Resolve `name` plus an argument list to a single function.
///
/// Overloads are selected by argument shape. Exactly one overload must
/// accept the supplied values; more than one is ambiguous at the
/// host-value level and fails rather than guessing.
pub(crate) fn resolve<'a>(
    abi: &'a Abi,
    name: &str,
    args: &[Value],
) -> ContractResult<&'a Function> {
    let candidates = abi
        .function(name)
        .ok_or_else(|| ContractError::UnknownMethod {
            name: name.to_owned(),
        })?;

    if let [only] = candidates {
        check_args(only, args)?;
        return Ok(only);
    }

    let matching: Vec<&Function> = candidates
        .iter()
        .filter(|function| {
            function.inputs.len() == args.len()
                && args
                    .iter()
                    .zip(&function.inputs)
                    .all(|(arg, param)| arg.is(&param.kind))
        })
        .collect();

    match matching.as_slice() {
        [] => {
            // Report against the overload closest in shape.
            match candidates
                .iter()
                .find(|function| function.inputs.len() == args.len())
            {
                Some(function) => {
                    check_args(function, args)?;
                    Ok(function)
                }
                None => Err(AbiError::ArgCountMismatch {
                    name: name.to_owned(),
                    expected: candidates[0].inputs.len(),
                    got: args.len(),
                }
                .into()),
            }
        }
        [only] => Ok(*only),
        many => Err(ContractError::AmbiguousOverload {
            name: name.to_owned(),
            count: many.len(),
        }),
    }
}

fn check_args(function: &Function, args: &[Value]) -> ContractResult<()> {
    if args.len() != function.inputs.len() {
        return Err(AbiError::ArgCountMismatch {
            name: function.name.clone(),
            expected: function.inputs.len(),
            got: args.len(),
        }
        .into());
    }
    for (index, (arg, param)) in args.iter().zip(&function.inputs).enumerate() {
        if !arg.is(&param.kind) {
            return Err(AbiError::ArgTypeMismatch {
                index,
                expected: param.kind.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Decode a call reply, classifying revert payloads first.
///
/// An empty reply where outputs were declared is an error in itself: it
/// usually means the call hit an address with no code.
pub(crate) fn decode_reply(
    abi: &Abi,
    function: &Function,
    reply: &[u8],
) -> ContractResult<Vec<Value>> {
    if reply.is_empty() {
        if function.outputs.is_empty() {
            return Ok(Vec::new());
        }
        return Err(ContractError::EmptyReply {
            name: function.name.clone(),
        });
    }
    if let Some(reason) = decode_revert(abi, reply) {
        return Err(ContractError::Revert(reason));
    }
    Ok(function.decode_output(reply)?)
}

#[cfg(test)]
mod tests {
    use hawser_abi::ParamKind;

    use super::*;

    fn overloaded_abi() -> Abi {
        r#"[
            {"type": "function", "name": "permit", "stateMutability": "nonpayable",
             "inputs": [
                {"name": "details", "type": "tuple", "components": [
                    {"name": "token", "type": "address"},
                    {"name": "amount", "type": "uint160"}
                ]},
                {"name": "deadline", "type": "uint256"}
             ], "outputs": []},
            {"type": "function", "name": "permit", "stateMutability": "nonpayable",
             "inputs": [
                {"name": "details", "type": "tuple", "components": [
                    {"name": "token", "type": "address"},
                    {"name": "amount", "type": "uint160"},
                    {"name": "nonce", "type": "uint48"}
                ]},
                {"name": "deadline", "type": "uint256"}
             ], "outputs": []}
        ]"#
        .parse()
        .unwrap()
    }

    #[test]
    fn unknown_names_fail_before_arguments_are_looked_at() {
        let abi = overloaded_abi();
        assert!(matches!(
            resolve(&abi, "permits", &[]).unwrap_err(),
            ContractError::UnknownMethod { .. }
        ));
    }

    #[test]
    fn overloads_select_by_argument_shape() {
        let abi = overloaded_abi();
        let address = hawser_core::H160::repeat_byte(1);

        // Three-field details tuple only matches the second overload.
        let args = vec![
            Value::Tuple(vec![
                Value::Address(address),
                Value::from(5u64),
                Value::from(1u64),
            ]),
            Value::from(99u64),
        ];
        let function = resolve(&abi, "permit", &args).unwrap();
        assert_eq!(function.inputs[0].kind.to_string(), "(address,uint160,uint48)");
    }

    #[test]
    fn shape_matching_both_overloads_is_ambiguous() {
        // Same name, same arity, argument assignable to both input lists.
        let abi: Abi = r#"[
            {"type": "function", "name": "mark", "stateMutability": "nonpayable",
             "inputs": [{"name": "level", "type": "uint8"}], "outputs": []},
            {"type": "function", "name": "mark", "stateMutability": "nonpayable",
             "inputs": [{"name": "level", "type": "uint256"}], "outputs": []}
        ]"#
        .parse()
        .unwrap();
        assert!(matches!(
            resolve(&abi, "mark", &[Value::from(1u64)]).unwrap_err(),
            ContractError::AmbiguousOverload { count: 2, .. }
        ));
    }

    #[test]
    fn wrong_arity_is_reported_against_the_declaration() {
        let abi = overloaded_abi();
        assert!(matches!(
            resolve(&abi, "permit", &[Value::from(1u64)]).unwrap_err(),
            ContractError::Abi(AbiError::ArgCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn empty_reply_with_declared_outputs_is_an_error() {
        let abi: Abi = r#"[
            {"type": "function", "name": "ok", "stateMutability": "view",
             "inputs": [], "outputs": [{"name": "", "type": "bool"}]}
        ]"#
        .parse()
        .unwrap();
        let function = &abi.function("ok").unwrap()[0];
        assert!(matches!(
            decode_reply(&abi, function, &[]).unwrap_err(),
            ContractError::EmptyReply { .. }
        ));

        let void: Abi = r#"[
            {"type": "function", "name": "poke", "stateMutability": "nonpayable",
             "inputs": [], "outputs": []}
        ]"#
        .parse()
        .unwrap();
        let poke = &void.function("poke").unwrap()[0];
        assert_eq!(decode_reply(&void, poke, &[]).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn revert_payloads_surface_as_reverts() {
        let abi: Abi = r#"[
            {"type": "function", "name": "ok", "stateMutability": "view",
             "inputs": [], "outputs": [{"name": "", "type": "bool"}]}
        ]"#
        .parse()
        .unwrap();
        let function = &abi.function("ok").unwrap()[0];

        let mut reply = hawser_abi::ERROR_SELECTOR.to_vec();
        reply.extend(
            hawser_abi::encode(
                &[ParamKind::String],
                &[Value::from("Ownable: caller is not the owner")],
            )
            .unwrap(),
        );
        match decode_reply(&abi, function, &reply).unwrap_err() {
            ContractError::Revert(reason) => {
                assert_eq!(reason.to_string(), "Ownable: caller is not the owner");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
