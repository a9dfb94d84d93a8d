use dvbnet_ctl::{
    AddRequest, AdapterRef, Controller, Devices, Encapsulation, InterfaceDescriptor, Links,
    RemoveRequest,
};

pub fn add<D: Devices, L: Links>(
    controller: &Controller<D, L>,
    adapter: AdapterRef,
    pid: u16,
    encapsulation: Encapsulation,
) -> anyhow::Result<()> {
    let if_num = controller.add(&AddRequest {
        adapter,
        pid,
        encapsulation,
    })?;

    println!("{}", adapter.device_name(if_num));

    Ok(())
}

pub fn remove<D: Devices, L: Links>(
    controller: &Controller<D, L>,
    adapter: AdapterRef,
    if_num: u16,
) -> anyhow::Result<()> {
    controller.remove(&RemoveRequest { adapter, if_num })?;
    Ok(())
}

pub fn list<D: Devices, L: Links>(
    controller: &Controller<D, L>,
    adapter: AdapterRef,
) -> anyhow::Result<()> {
    let descriptors = controller.enumerate(adapter)?;
    print!("{}", render_interfaces(&descriptors));

    Ok(())
}

pub fn render_interfaces(descriptors: &[InterfaceDescriptor]) -> String {
    if descriptors.is_empty() {
        return "No interfaces\n".to_string();
    }

    descriptors
        .iter()
        .map(|descriptor| format!("{descriptor}\n"))
        .collect()
}
