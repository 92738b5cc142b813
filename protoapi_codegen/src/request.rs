use quote::quote;

use crate::data::CodeData;
use crate::error::Result;
use crate::fragment;

/// Render the body of one client method.
///
/// Expects `self`, `ctx`, `req`, `opts` and a `mut res` holding the default
/// response in scope, evaluates to `Result<Res>`. The fragments of `code` are
/// inserted verbatim in this order: options merge, route, body, request
/// construction, query, headers, request hook, response hook.
pub fn build_request_code(code: &CodeData, rt: &syn::Path) -> Result<String> {
    let route = fragment::stmts(&code.route, "route fragment")?;
    let body = fragment::stmts(&code.body, "body fragment")?;
    let query = fragment::stmts(&code.query, "query fragment")?;

    let verb = code.verb.to_tokens(rt);

    let body_arg = if body.is_empty() {
        quote!(::std::option::Option::None)
    } else {
        quote!(::std::option::Option::Some(body))
    };

    let query_block = (!query.is_empty()).then(|| {
        quote! {
            let mut params = #rt::Params::from_url(request.url());
            #(#query)*
            params.encode_into(request.url_mut());
        }
    });

    let tokens = quote! {
        let opt = self.opts.merged(opts);
        let mut headers: ::std::vec::Vec<(&'static str, ::std::string::String)> = ::std::vec::Vec::new();

        #(#route)*

        #(#body)*

        let mut request = #rt::new_request(#verb, &raw_url, #body_arg)?;

        #query_block

        for (name, value) in headers {
            request.headers_mut().insert(name, #rt::header_value(name, &value)?);
        }

        let resp = opt.do_request(ctx, opt.client(), request).await?;
        opt.do_response(ctx, resp, &mut res).await?;

        ::std::result::Result::Ok(res)
    };

    tracing::debug!(service = %code.service, verb = %code.verb, "rendered request code");

    Ok(tokens.to_string())
}
